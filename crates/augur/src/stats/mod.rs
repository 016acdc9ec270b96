//! Descriptive statistics and the shared pure helpers.

pub mod core;
mod descriptive;

pub use descriptive::{
    compute_statistics, count_duplicate_rows, count_missing_values, CategoricalColumnStats,
    DatasetStatistics, NumericColumnStats, TopValue,
};
