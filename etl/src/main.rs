//! Rossmann ETL CLI
//!
//! ```bash
//! rossmann-etl        # reads Data/*.csv, writes Data/processed/{train,test}_clean.csv
//! ```

use clap::Parser;
use rossmann_etl::{run_pipeline, EtlConfig, TracingSink};

#[derive(Parser)]
#[command(name = "rossmann-etl")]
#[command(version, about = "Enrich Rossmann sales data with store, state and geo features", long_about = None)]
struct Cli {}

fn main() {
    let _cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let config = EtlConfig::default();
    match run_pipeline(&config, &TracingSink) {
        Ok(summary) => {
            tracing::info!(
                train_rows = summary.train_rows,
                test_rows = summary.test_rows,
                stores = summary.stores,
                states = summary.states,
                "Done"
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
