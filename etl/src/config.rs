//! Pipeline configuration.
//!
//! Source and output file names are fixed. Only the data root can change,
//! and only programmatically; the binary always uses [`EtlConfig::default`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default data root, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "Data";

/// Subdirectory of the data root receiving the enriched tables.
pub const PROCESSED_DIR: &str = "processed";

pub const TRAIN_FILE: &str = "train.csv";
pub const TEST_FILE: &str = "test.csv";
pub const STORE_FILE: &str = "store.csv";
pub const STORE_STATES_FILE: &str = "store_states.csv";
/// Latin-1 encoded.
pub const STORE_GEO_FILE: &str = "rossmann_store_geo.csv";

pub const TRAIN_OUTPUT_FILE: &str = "train_clean.csv";
pub const TEST_OUTPUT_FILE: &str = "test_clean.csv";

/// Locations used by a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Directory holding the five raw sources
    pub data_dir: PathBuf,

    /// Name of the output subdirectory under `data_dir`
    pub processed_dir: String,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self::with_data_dir(DEFAULT_DATA_DIR)
    }
}

impl EtlConfig {
    pub fn with_data_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: dir.as_ref().to_path_buf(),
            processed_dir: PROCESSED_DIR.to_string(),
        }
    }

    /// Path of a raw source file
    pub fn source_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.data_dir.join(&self.processed_dir)
    }

    pub fn train_output(&self) -> PathBuf {
        self.output_dir().join(TRAIN_OUTPUT_FILE)
    }

    pub fn test_output(&self) -> PathBuf {
        self.output_dir().join(TEST_OUTPUT_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = EtlConfig::default();
        assert_eq!(config.source_path(TRAIN_FILE), PathBuf::from("Data/train.csv"));
        assert_eq!(config.output_dir(), PathBuf::from("Data/processed"));
        assert_eq!(config.test_output(), PathBuf::from("Data/processed/test_clean.csv"));
    }
}
