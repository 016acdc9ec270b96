//! CLI command implementations.

pub mod analyze;
pub mod chart;
pub mod serve;
