//! Schema types for representing inferred table structure.

mod column;
mod table;
mod types;

pub use column::ColumnDescriptor;
pub use table::DatasetSnapshot;
pub use types::ColumnType;
