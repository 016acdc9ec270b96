//! Augur: analysis engine for tabular datasets.
//!
//! Augur turns raw CSV and Excel files into typed snapshots, then derives
//! descriptive statistics, automated insights and chart-ready projections
//! from them.
//!
//! # Core Principles
//!
//! - **Typed once**: cells are parsed into typed values a single time; every
//!   downstream computation works on the same snapshot
//! - **Non-destructive**: original files are never modified
//! - **Deterministic**: the same content always produces the same analysis
//!
//! # Example
//!
//! ```no_run
//! use augur::Augur;
//!
//! let augur = Augur::new();
//! let result = augur.analyze("sales.csv").unwrap();
//!
//! println!("Columns: {}", result.columns.len());
//! println!("Insights: {}", result.insights.len());
//! ```

pub mod chart;
pub mod error;
pub mod inference;
pub mod input;
pub mod insight;
pub mod schema;
pub mod stats;
pub mod value;

mod augur;

pub use crate::augur::{AnalysisResult, Augur, AugurConfig};
pub use chart::{ChartData, ChartKind, ChartPayload, ChartTypeDescriptor};
pub use error::{AugurError, Result};
pub use input::{DataTable, SourceMetadata};
pub use insight::{Insight, InsightType, Severity};
pub use schema::{ColumnDescriptor, ColumnType, DatasetSnapshot};
pub use stats::DatasetStatistics;
pub use value::Value;
