//! Dataset-level descriptive statistics.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::core;
use crate::schema::{ColumnType, DatasetSnapshot};
use crate::value::Value;

/// Summary statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericColumnStats {
    pub column: String,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
}

/// One categorical value with its occurrence count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopValue {
    pub value: String,
    pub count: usize,
}

/// Summary statistics for one categorical (string-typed) column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalColumnStats {
    pub column: String,
    pub unique_values: usize,
    /// Top 5 values by frequency descending, ties in first-encountered order.
    pub top_values: Vec<TopValue>,
}

/// Descriptive statistics for a whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    pub total_rows: usize,
    pub total_columns: usize,
    /// Missing cells across all rows and columns.
    pub missing_values: usize,
    /// Rows whose full content matches an earlier row.
    pub duplicate_rows: usize,
    pub numeric_columns: Vec<NumericColumnStats>,
    pub categorical_columns: Vec<CategoricalColumnStats>,
}

/// Compute descriptive statistics for a snapshot. Pure: same snapshot, same
/// output.
pub fn compute_statistics(snapshot: &DatasetSnapshot) -> DatasetStatistics {
    let mut numeric_columns = Vec::new();
    let mut categorical_columns = Vec::new();

    for column in &snapshot.columns {
        match column.column_type {
            ColumnType::Number => {
                let values: Vec<f64> = snapshot
                    .column_values(column.position)
                    .filter_map(Value::as_number)
                    .collect();
                if values.is_empty() {
                    continue;
                }
                numeric_columns.push(NumericColumnStats {
                    column: column.name.clone(),
                    mean: core::mean(&values),
                    median: core::median(&values),
                    min: values.iter().copied().fold(f64::INFINITY, f64::min),
                    max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    std: core::population_std(&values),
                });
            }
            ColumnType::String => {
                let mut counts: IndexMap<&str, usize> = IndexMap::new();
                for cell in snapshot.column_values(column.position) {
                    if let Value::String(s) = cell {
                        *counts.entry(s.as_str()).or_insert(0) += 1;
                    }
                }
                if counts.is_empty() {
                    continue;
                }
                let unique_values = counts.len();
                let mut entries: Vec<(&str, usize)> = counts.into_iter().collect();
                // Stable sort keeps first-encountered order for ties
                entries.sort_by(|a, b| b.1.cmp(&a.1));
                let top_values = entries
                    .into_iter()
                    .take(5)
                    .map(|(value, count)| TopValue {
                        value: value.to_string(),
                        count,
                    })
                    .collect();
                categorical_columns.push(CategoricalColumnStats {
                    column: column.name.clone(),
                    unique_values,
                    top_values,
                });
            }
            ColumnType::Date | ColumnType::Boolean => {}
        }
    }

    DatasetStatistics {
        total_rows: snapshot.row_count(),
        total_columns: snapshot.column_count(),
        missing_values: count_missing_values(snapshot),
        duplicate_rows: count_duplicate_rows(snapshot),
        numeric_columns,
        categorical_columns,
    }
}

/// Count missing cells across the whole snapshot.
pub fn count_missing_values(snapshot: &DatasetSnapshot) -> usize {
    snapshot
        .rows
        .iter()
        .flat_map(|row| row.iter())
        .filter(|cell| cell.is_missing())
        .count()
}

/// Count rows whose serialized content matches an earlier row. The first
/// occurrence is not counted.
pub fn count_duplicate_rows(snapshot: &DatasetSnapshot) -> usize {
    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicates = 0;

    for row in &snapshot.rows {
        // Cells render unambiguously within a column since the type is
        // uniform; 0x1f never occurs in delimited text
        let key = row
            .iter()
            .map(Value::display_text)
            .collect::<Vec<_>>()
            .join("\u{1f}");
        if !seen.insert(key) {
            duplicates += 1;
        }
    }

    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::TypeInference;
    use crate::input::DataTable;

    fn snapshot_from(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> DatasetSnapshot {
        let table = DataTable::new(
            headers.into_iter().map(String::from).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        );
        let columns = TypeInference::new().infer_schema(&table);
        DatasetSnapshot::build(&table, columns)
    }

    #[test]
    fn test_totals_and_missing() {
        let snapshot = snapshot_from(
            vec!["a", "b"],
            vec![vec!["1", "x"], vec!["", "y"], vec!["3", ""]],
        );
        let stats = compute_statistics(&snapshot);
        assert_eq!(stats.total_rows, 3);
        assert_eq!(stats.total_columns, 2);
        assert_eq!(stats.missing_values, 2);
        assert_eq!(stats.duplicate_rows, 0);
    }

    #[test]
    fn test_duplicate_rows_first_occurrence_not_counted() {
        let snapshot = snapshot_from(
            vec!["a", "b"],
            vec![
                vec!["1", "x"],
                vec!["1", "x"],
                vec!["1", "x"],
                vec!["2", "y"],
            ],
        );
        let stats = compute_statistics(&snapshot);
        assert_eq!(stats.duplicate_rows, 2);
    }

    #[test]
    fn test_numeric_column_stats() {
        let snapshot = snapshot_from(
            vec!["v"],
            vec![
                vec!["2"],
                vec!["4"],
                vec!["4"],
                vec!["4"],
                vec!["5"],
                vec!["5"],
                vec!["7"],
                vec!["9"],
            ],
        );
        let stats = compute_statistics(&snapshot);
        assert_eq!(stats.numeric_columns.len(), 1);
        let col = &stats.numeric_columns[0];
        assert_eq!(col.mean, 5.0);
        assert_eq!(col.std, 2.0);
        assert_eq!(col.min, 2.0);
        assert_eq!(col.max, 9.0);
        assert_eq!(col.median, 4.5);
    }

    #[test]
    fn test_categorical_top_values_order() {
        let snapshot = snapshot_from(
            vec!["city"],
            vec![
                vec!["LA"],
                vec!["NYC"],
                vec!["NYC"],
                vec!["SF"],
                vec!["LA"],
                vec!["Boston"],
            ],
        );
        let stats = compute_statistics(&snapshot);
        let col = &stats.categorical_columns[0];
        assert_eq!(col.unique_values, 4);
        // LA and NYC both count 2; LA was seen first
        assert_eq!(col.top_values[0].value, "LA");
        assert_eq!(col.top_values[1].value, "NYC");
        assert_eq!(col.top_values[2].count, 1);
    }

    #[test]
    fn test_clean_dataset_reports_zero() {
        let snapshot = snapshot_from(vec!["a", "b"], vec![vec!["1", "x"], vec!["2", "y"]]);
        let stats = compute_statistics(&snapshot);
        assert_eq!(stats.missing_values, 0);
        assert_eq!(stats.duplicate_rows, 0);
    }

    #[test]
    fn test_idempotent() {
        let snapshot = snapshot_from(
            vec!["a", "b"],
            vec![vec!["1", "x"], vec!["2", "y"], vec!["2", ""]],
        );
        let first = compute_statistics(&snapshot);
        let second = compute_statistics(&snapshot);
        assert_eq!(first, second);
    }
}
