//! Core type definitions for schema representation.

use serde::{Deserialize, Serialize};

/// Inferred data type for a column.
///
/// Classification is first-match-wins in this order: number, date, boolean,
/// string. A column with no non-missing values is `String`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Finite numeric values.
    Number,
    /// Calendar dates or timestamps.
    Date,
    /// Boolean flags (`true`/`false`/`1`/`0`).
    Boolean,
    /// Text values, and the fallback for everything else.
    #[default]
    String,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Number)
    }

    /// Returns true if this type is temporal.
    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnType::Date)
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
            ColumnType::String => "string",
        }
    }
}
