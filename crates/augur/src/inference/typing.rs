//! Column type inference.

use indexmap::IndexSet;

use crate::input::DataTable;
use crate::schema::{ColumnDescriptor, ColumnType};
use crate::value;

/// Infers column types and sample values from a raw table.
#[derive(Debug, Clone)]
pub struct TypeInference {
    /// Maximum distinct sample values to keep per column.
    pub sample_limit: usize,
}

impl Default for TypeInference {
    fn default() -> Self {
        Self { sample_limit: 5 }
    }
}

impl TypeInference {
    /// Create an inference engine with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Infer a descriptor for every column of the table.
    pub fn infer_schema(&self, table: &DataTable) -> Vec<ColumnDescriptor> {
        table
            .headers
            .iter()
            .enumerate()
            .map(|(position, name)| {
                let values: Vec<&str> = table
                    .column_values(position)
                    .filter(|v| !DataTable::is_missing(v))
                    .collect();

                let column_type = infer_column_type(&values);
                let samples = sample_values(&values, self.sample_limit);

                ColumnDescriptor::new(name.clone(), position, column_type)
                    .with_sample_values(samples)
            })
            .collect()
    }
}

/// Classify a column from its non-missing values. First matching rule wins:
/// number, then date, then boolean; anything else is a string. A column with
/// no values at all is a string.
pub fn infer_column_type(values: &[&str]) -> ColumnType {
    if values.is_empty() {
        return ColumnType::String;
    }
    if values.iter().all(|v| value::parse_number(v).is_some()) {
        return ColumnType::Number;
    }
    if values.iter().all(|v| value::parse_date(v).is_some()) {
        return ColumnType::Date;
    }
    if values.iter().all(|v| value::parse_boolean(v).is_some()) {
        return ColumnType::Boolean;
    }
    ColumnType::String
}

/// First `limit` distinct values in row order.
fn sample_values(values: &[&str], limit: usize) -> Vec<String> {
    let mut seen: IndexSet<&str> = IndexSet::new();
    for v in values {
        seen.insert(v);
        if seen.len() >= limit {
            break;
        }
    }
    seen.into_iter().map(String::from).collect()
}
