//! API request handlers.

mod charts;
mod datasets;
mod insights;

pub use charts::*;
pub use datasets::*;
pub use insights::*;

use serde::Serialize;

/// Success envelope: `{success: true, data, metadata?}`.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize, M: Serialize = serde_json::Value> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<M>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a payload with no metadata.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            metadata: None,
        }
    }
}

impl<T: Serialize, M: Serialize> ApiResponse<T, M> {
    /// Wrap a payload with metadata.
    pub fn with_metadata(data: T, metadata: M) -> Self {
        Self {
            success: true,
            data,
            metadata: Some(metadata),
        }
    }
}
