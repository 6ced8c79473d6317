//! Hash left join on a single key column.
//!
//! ```text
//! left (N rows)        right (unique keys)        result (N rows)
//! ┌───────┬─────┐      ┌───────┬───────┐          ┌───────┬─────┬───────┐
//! │ Store │ ... │  ⟕   │ Store │ State │    →     │ Store │ ... │ State │
//! └───────┴─────┘      └───────┴───────┘          └───────┴─────┴───────┘
//! ```
//!
//! Every left row appears exactly once, in its original position. Left rows
//! without a match get nulls in every right column.

use std::collections::{HashMap, HashSet};
use std::iter;

use crate::error::{TransformError, TransformResult};
use crate::models::{Cell, Column, JoinKey, Table};

const LEFT_SUFFIX: &str = "_x";
const RIGHT_SUFFIX: &str = "_y";

/// Map each key of `table[key_idx]` to its row, refusing duplicates.
fn unique_index(table: &Table, key_idx: usize) -> TransformResult<HashMap<JoinKey, usize>> {
    let mut index = HashMap::with_capacity(table.len());

    for (row_idx, row) in table.rows.iter().enumerate() {
        let Some(key) = JoinKey::from_cell(&row[key_idx]) else {
            continue;
        };
        if index.contains_key(&key) {
            return Err(TransformError::DuplicateKey {
                table: table.name.clone(),
                column: table.columns[key_idx].name.clone(),
                key: key.to_string(),
            });
        }
        index.insert(key, row_idx);
    }

    Ok(index)
}

fn suffixed(column: &Column, overlap: &HashSet<&str>, suffix: &str) -> Column {
    if overlap.contains(column.name.as_str()) {
        Column::new(format!("{}{}", column.name, suffix), column.kind)
    } else {
        column.clone()
    }
}

/// Left join `left` with `right` on the column `on`.
///
/// The result keeps the left table's name and key column, followed by the
/// right table's columns minus its key. Non-key columns present on both sides
/// are renamed with `_x` / `_y` suffixes.
pub fn left_join(left: &Table, right: &Table, on: &str) -> TransformResult<Table> {
    let left_key = left.require_column(on)?;
    let right_key = right.require_column(on)?;
    let index = unique_index(right, right_key)?;

    let left_names: HashSet<&str> = left.columns.iter().map(|c| c.name.as_str()).collect();
    let overlap: HashSet<&str> = right
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .filter(|name| *name != on && left_names.contains(name))
        .collect();

    let columns: Vec<Column> = left
        .columns
        .iter()
        .map(|c| suffixed(c, &overlap, LEFT_SUFFIX))
        .chain(
            right
                .columns
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != right_key)
                .map(|(_, c)| suffixed(c, &overlap, RIGHT_SUFFIX)),
        )
        .collect();

    let right_width = right.columns.len() - 1;
    let mut joined = Table::new(left.name.clone(), columns);
    joined.rows.reserve(left.len());

    for row in &left.rows {
        let mut out = Vec::with_capacity(row.len() + right_width);
        out.extend(row.iter().cloned());

        let matched = JoinKey::from_cell(&row[left_key]).and_then(|key| index.get(&key));
        match matched {
            Some(&right_row) => out.extend(
                right.rows[right_row]
                    .iter()
                    .enumerate()
                    .filter(|(idx, _)| *idx != right_key)
                    .map(|(_, cell)| cell.clone()),
            ),
            None => out.extend(iter::repeat(Cell::Null).take(right_width)),
        }

        joined.push_row(out);
    }

    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnType;

    fn table(name: &str, columns: &[(&str, ColumnType)], rows: Vec<Vec<Cell>>) -> Table {
        let mut t = Table::new(
            name,
            columns.iter().map(|(n, k)| Column::new(*n, *k)).collect(),
        );
        for row in rows {
            t.push_row(row);
        }
        t
    }

    fn stores() -> Table {
        table(
            "store",
            &[("Store", ColumnType::Int), ("StoreType", ColumnType::Str)],
            vec![
                vec![Cell::Int(1), Cell::Str("c".into())],
                vec![Cell::Int(2), Cell::Str("a".into())],
                vec![Cell::Int(3), Cell::Str("a".into())],
            ],
        )
    }

    fn states() -> Table {
        table(
            "store_states",
            &[("Store", ColumnType::Int), ("State", ColumnType::Str)],
            vec![
                vec![Cell::Int(3), Cell::Str("NW".into())],
                vec![Cell::Int(1), Cell::Str("HE".into())],
            ],
        )
    }

    #[test]
    fn test_left_join_fills_unmatched_with_null() {
        let joined = left_join(&stores(), &states(), "Store").unwrap();

        assert_eq!(joined.column_names(), vec!["Store", "StoreType", "State"]);
        assert_eq!(joined.len(), 3);
        assert_eq!(joined.value(0, "State"), Some(&Cell::Str("HE".into())));
        assert_eq!(joined.value(1, "State"), Some(&Cell::Null));
        assert_eq!(joined.value(1, "StoreType"), Some(&Cell::Str("a".into())));
        assert_eq!(joined.value(2, "State"), Some(&Cell::Str("NW".into())));
    }

    #[test]
    fn test_left_order_and_repeats_preserved() {
        let sales = table(
            "train",
            &[("Store", ColumnType::Int), ("Sales", ColumnType::Int)],
            vec![
                vec![Cell::Int(3), Cell::Int(10)],
                vec![Cell::Int(1), Cell::Int(20)],
                vec![Cell::Int(3), Cell::Int(30)],
                vec![Cell::Int(9), Cell::Int(40)],
            ],
        );
        let joined = left_join(&sales, &stores(), "Store").unwrap();

        assert_eq!(joined.len(), 4);
        let sales_col: Vec<_> = joined.column_values("Sales").unwrap();
        assert_eq!(
            sales_col,
            vec![&Cell::Int(10), &Cell::Int(20), &Cell::Int(30), &Cell::Int(40)]
        );
        assert_eq!(joined.value(3, "StoreType"), Some(&Cell::Null));
    }

    #[test]
    fn test_null_left_key_never_matches() {
        let sales = table(
            "train",
            &[("Store", ColumnType::Int)],
            vec![vec![Cell::Null]],
        );
        let joined = left_join(&sales, &stores(), "Store").unwrap();
        assert_eq!(joined.value(0, "StoreType"), Some(&Cell::Null));
    }

    #[test]
    fn test_duplicate_right_key_rejected() {
        let mut dup = states();
        dup.push_row(vec![Cell::Int(1), Cell::Str("BY".into())]);

        let err = left_join(&stores(), &dup, "Store").unwrap_err();
        match err {
            TransformError::DuplicateKey { table, key, .. } => {
                assert_eq!(table, "store_states");
                assert_eq!(key, "1");
            }
            other => panic!("expected DuplicateKey, got {:?}", other),
        }
    }

    #[test]
    fn test_overlapping_columns_get_suffixes() {
        let right = table(
            "extra",
            &[("Store", ColumnType::Int), ("StoreType", ColumnType::Str)],
            vec![vec![Cell::Int(1), Cell::Str("z".into())]],
        );
        let joined = left_join(&stores(), &right, "Store").unwrap();

        assert_eq!(joined.column_names(), vec!["Store", "StoreType_x", "StoreType_y"]);
        assert_eq!(joined.value(0, "StoreType_y"), Some(&Cell::Str("z".into())));
    }

    #[test]
    fn test_missing_key_column() {
        let no_key = table("store_states", &[("State", ColumnType::Str)], vec![]);
        let err = left_join(&stores(), &no_key, "Store").unwrap_err();
        assert!(matches!(err, TransformError::MissingColumn { .. }));
    }
}
