//! Inference engine for schema detection.

mod typing;

pub use typing::{infer_column_type, TypeInference};
