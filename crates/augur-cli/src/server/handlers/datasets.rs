//! Dataset lifecycle handlers: upload, listing, retrieval, deletion, stats.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use augur::input::FileKind;
use augur::DatasetStatistics;

use super::ApiResponse;
use crate::server::error::ApiError;
use crate::server::state::{AppState, DatasetRecord, DatasetStatus};

/// Response for a fresh upload.
#[derive(Serialize)]
pub struct UploadResponse {
    pub id: String,
    pub name: String,
    pub status: DatasetStatus,
}

/// POST /api/datasets/upload
///
/// Stores the file, registers the record as `processing` and returns
/// immediately; analysis runs as a detached task. Callers poll.
pub async fn upload_dataset(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadResponse>>), ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let name = field
                .file_name()
                .map(sanitize_file_name)
                .ok_or_else(|| ApiError::BadRequest("File name missing".to_string()))?;
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Upload read failed: {}", e)))?;
            upload = Some((name, bytes.to_vec()));
        }
    }

    let Some((name, bytes)) = upload else {
        return Err(ApiError::BadRequest("No file uploaded".to_string()));
    };

    let kind = FileKind::from_path(std::path::Path::new(&name))
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let record = DatasetRecord::new(&name, kind.as_str(), bytes.len() as u64);
    let stored = state.upload_dir.join(format!("{}_{}", record.id, name));
    let record = record.with_file_path(stored.clone());

    tokio::fs::write(&stored, &bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("storing upload {}: {}", stored.display(), e)))?;

    let response = UploadResponse {
        id: record.id.clone(),
        name: record.name.clone(),
        status: record.status,
    };
    state.insert(record).await;

    let task_state = state.clone();
    let id = response.id.clone();
    tokio::spawn(async move {
        task_state.process_dataset(id).await;
    });

    Ok((StatusCode::CREATED, Json(ApiResponse::new(response))))
}

/// Query parameters for the dataset listing.
#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub status: Option<String>,
    pub search: Option<String>,
}

/// One dataset in a listing, without the heavyweight analysis payloads.
#[derive(Serialize)]
pub struct DatasetSummary {
    pub id: String,
    pub name: String,
    pub file_type: String,
    pub size_bytes: u64,
    pub status: DatasetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub row_count: usize,
    pub column_count: usize,
    pub uploaded_at: DateTime<Utc>,
}

/// Paging metadata for listings.
#[derive(Serialize)]
pub struct PageMetadata {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

impl From<&DatasetRecord> for DatasetSummary {
    fn from(record: &DatasetRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            file_type: record.file_type.clone(),
            size_bytes: record.size_bytes,
            status: record.status,
            error_message: record.error_message.clone(),
            row_count: record.row_count,
            column_count: record.column_count,
            uploaded_at: record.uploaded_at,
        }
    }
}

/// GET /api/datasets
pub async fn list_datasets(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<DatasetSummary>, PageMetadata>>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).max(1);

    let datasets = state.datasets.read().await;
    let mut records: Vec<&DatasetRecord> = datasets
        .values()
        .filter(|r| match query.status.as_deref() {
            Some(status) => r.status.as_str() == status,
            None => true,
        })
        .filter(|r| match query.search.as_deref() {
            Some(search) => r.name.to_lowercase().contains(&search.to_lowercase()),
            None => true,
        })
        .collect();
    records.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));

    let total = records.len();
    let pages = total.div_ceil(limit);
    let summaries: Vec<DatasetSummary> = records
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .map(DatasetSummary::from)
        .collect();

    Ok(Json(ApiResponse::with_metadata(
        summaries,
        PageMetadata {
            page,
            limit,
            total,
            pages,
        },
    )))
}

/// GET /api/datasets/:id
pub async fn get_dataset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DatasetRecord>>, ApiError> {
    let record = state
        .get_and_touch(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Dataset not found: {}", id)))?;
    Ok(Json(ApiResponse::new(record)))
}

/// DELETE /api/datasets/:id
pub async fn delete_dataset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let record = state
        .remove(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Dataset not found: {}", id)))?;

    if let Err(e) = tokio::fs::remove_file(&record.file_path).await {
        log::warn!("could not delete {}: {}", record.file_path.display(), e);
    }

    Ok(Json(ApiResponse::new(serde_json::json!({ "id": id }))))
}

/// Stats payload: upload summary plus the full descriptive statistics.
#[derive(Serialize)]
pub struct DatasetStats {
    pub summary: DatasetSummary,
    pub statistics: DatasetStatistics,
}

/// GET /api/datasets/:id/stats
pub async fn get_dataset_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DatasetStats>>, ApiError> {
    let record = require_ready(&state, &id).await?;
    let statistics = record
        .statistics
        .clone()
        .ok_or_else(|| ApiError::NotFound(format!("Dataset not ready: {}", id)))?;

    Ok(Json(ApiResponse::new(DatasetStats {
        summary: DatasetSummary::from(&record),
        statistics,
    })))
}

/// Look up a record that must have finished processing. Unknown ids and
/// records still processing (or failed) both surface as 404.
pub async fn require_ready(state: &AppState, id: &str) -> Result<DatasetRecord, ApiError> {
    let record = state
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Dataset not found: {}", id)))?;
    if !record.is_ready() {
        return Err(ApiError::NotFound(format!(
            "Dataset not ready: {} (status {})",
            id,
            record.status.as_str()
        )));
    }
    Ok(record)
}

/// Keep only the final path component of a client-supplied file name.
fn sanitize_file_name(name: &str) -> String {
    name.rsplit(['/', '\\']).next().unwrap_or(name).to_string()
}
