//! The typed dataset snapshot used by all downstream analysis.

use serde::{Deserialize, Serialize};

use super::column::ColumnDescriptor;
use super::types::ColumnType;
use crate::input::DataTable;
use crate::value::{self, Value};

/// Immutable typed view of a dataset: descriptors plus typed rows.
///
/// Built once per processing run from the raw table and the inferred
/// descriptors; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSnapshot {
    /// Column descriptors in header order.
    pub columns: Vec<ColumnDescriptor>,
    /// Typed cells (row-major order, aligned with `columns`).
    pub rows: Vec<Vec<Value>>,
}

impl DatasetSnapshot {
    /// Convert a raw table into typed cells using the inferred descriptors.
    pub fn build(table: &DataTable, columns: Vec<ColumnDescriptor>) -> Self {
        let rows = table
            .rows
            .iter()
            .map(|raw_row| {
                columns
                    .iter()
                    .map(|col| {
                        let raw = raw_row.get(col.position).map(|s| s.as_str()).unwrap_or("");
                        typed_cell(raw, col.column_type)
                    })
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Look up a column's position by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get a column descriptor by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All cells of one column, by position.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows
            .iter()
            .map(move |row| row.get(index).unwrap_or(&Value::Missing))
    }

    /// Columns of a given inferred type, in header order.
    pub fn columns_of_type(&self, column_type: ColumnType) -> Vec<&ColumnDescriptor> {
        self.columns
            .iter()
            .filter(|c| c.column_type == column_type)
            .collect()
    }

    /// First column of a given inferred type.
    pub fn first_of_type(&self, column_type: ColumnType) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.column_type == column_type)
    }

    /// Column names in header order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Convert one raw cell according to its column's inferred type.
///
/// Inference only assigns a type when every non-missing value parses, so the
/// fallback arm is unreachable for snapshots built from inferred descriptors;
/// it keeps the conversion total for descriptors constructed by hand.
fn typed_cell(raw: &str, column_type: ColumnType) -> Value {
    if DataTable::is_missing(raw) {
        return Value::Missing;
    }
    let parsed = match column_type {
        ColumnType::Number => value::parse_number(raw).map(Value::Number),
        ColumnType::Date => value::parse_date(raw).map(Value::Date),
        ColumnType::Boolean => value::parse_boolean(raw).map(Value::Boolean),
        ColumnType::String => Some(Value::String(raw.to_string())),
    };
    parsed.unwrap_or_else(|| Value::String(raw.to_string()))
}
