//! Per-column schema description.

use serde::{Deserialize, Serialize};

use super::types::ColumnType;

/// Inferred description of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name from the header row.
    pub name: String,
    /// Column position (0-based).
    pub position: usize,
    /// Inferred type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// First distinct non-missing values observed, in row order (up to 5).
    pub sample_values: Vec<String>,
}

impl ColumnDescriptor {
    /// Create a descriptor for a column.
    pub fn new(name: impl Into<String>, position: usize, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            position,
            column_type,
            sample_values: Vec::new(),
        }
    }

    /// Attach sample values.
    pub fn with_sample_values(mut self, samples: Vec<String>) -> Self {
        self.sample_values = samples;
        self
    }
}
