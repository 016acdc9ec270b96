//! Chart handlers: projection, availability, dashboard, export.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use augur::chart::available_chart_types;
use augur::schema::ColumnType;
use augur::{Augur, ChartKind, ChartPayload, ChartTypeDescriptor};

use super::datasets::require_ready;
use super::ApiResponse;
use crate::server::error::ApiError;
use crate::server::state::{AppState, DatasetRecord};

/// Row cap for interactive chart requests.
const DEFAULT_CHART_LIMIT: usize = 100;
/// Row cap for exports.
const DEFAULT_EXPORT_LIMIT: usize = 1000;

/// Query parameters for chart projection.
#[derive(Deserialize)]
pub struct ChartQuery {
    pub chart_type: Option<String>,
    pub columns: Option<String>,
    pub limit: Option<usize>,
}

/// Metadata attached to chart responses.
#[derive(Serialize)]
pub struct ChartMetadata {
    pub dataset_name: String,
    pub row_count: usize,
    pub column_count: usize,
}

impl From<&DatasetRecord> for ChartMetadata {
    fn from(record: &DatasetRecord) -> Self {
        Self {
            dataset_name: record.name.clone(),
            row_count: record.row_count,
            column_count: record.column_count,
        }
    }
}

/// Project one chart off the engine without blocking the runtime.
async fn project_chart(
    state: &AppState,
    record: &DatasetRecord,
    kind: ChartKind,
    columns: Vec<String>,
    limit: usize,
) -> Result<ChartPayload, ApiError> {
    let engine: Arc<Augur> = Arc::clone(&state.engine);
    let path = record.file_path.clone();
    tokio::task::spawn_blocking(move || engine.chart(&path, kind, &columns, Some(limit)))
        .await
        .map_err(|e| ApiError::Internal(format!("chart task: {}", e)))?
        .map_err(ApiError::from)
}

/// Parse an optional chart kind, defaulting to bar.
fn parse_kind(kind: Option<&str>) -> Result<ChartKind, ApiError> {
    match kind {
        Some(kind) => kind.parse().map_err(ApiError::from),
        None => Ok(ChartKind::Bar),
    }
}

/// Split a comma-separated column list.
fn parse_columns(columns: Option<&str>) -> Vec<String> {
    columns
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// GET /api/charts/:id
pub async fn get_chart(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ApiResponse<ChartPayload, ChartMetadata>>, ApiError> {
    let record = require_ready(&state, &id).await?;
    let kind = parse_kind(query.chart_type.as_deref())?;
    let columns = parse_columns(query.columns.as_deref());
    let limit = query.limit.unwrap_or(DEFAULT_CHART_LIMIT);

    let payload = project_chart(&state, &record, kind, columns, limit).await?;

    Ok(Json(ApiResponse::with_metadata(
        payload,
        ChartMetadata::from(&record),
    )))
}

/// GET /api/charts/:id/types
pub async fn get_chart_types(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChartTypeDescriptor>>>, ApiError> {
    let record = require_ready(&state, &id).await?;
    Ok(Json(ApiResponse::new(available_chart_types(
        &record.columns,
    ))))
}

/// Pre-built charts for the dataset overview page. Sections whose column
/// requirements are unmet are omitted.
#[derive(Serialize)]
pub struct DashboardData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ChartPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorical: Option<ChartPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeseries: Option<ChartPayload>,
}

/// GET /api/charts/:id/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DashboardData, ChartMetadata>>, ApiError> {
    let record = require_ready(&state, &id).await?;

    let summary = project_chart(&state, &record, ChartKind::Summary, Vec::new(), 10)
        .await
        .ok();

    let categorical = match record
        .columns
        .iter()
        .find(|c| c.column_type == ColumnType::String)
    {
        Some(column) => project_chart(
            &state,
            &record,
            ChartKind::Pie,
            vec![column.name.clone()],
            10,
        )
        .await
        .ok(),
        None => None,
    };

    let has_date = record
        .columns
        .iter()
        .any(|c| c.column_type == ColumnType::Date);
    let has_numeric = record
        .columns
        .iter()
        .any(|c| c.column_type == ColumnType::Number);
    let timeseries = if has_date && has_numeric {
        project_chart(&state, &record, ChartKind::Line, Vec::new(), 50)
            .await
            .ok()
    } else {
        None
    };

    Ok(Json(ApiResponse::with_metadata(
        DashboardData {
            summary,
            categorical,
            timeseries,
        },
        ChartMetadata::from(&record),
    )))
}

/// Query parameters for chart export.
#[derive(Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
    pub chart_type: Option<String>,
    pub columns: Option<String>,
    pub limit: Option<usize>,
}

/// Metadata attached to JSON exports.
#[derive(Serialize)]
pub struct ExportMetadata {
    pub dataset_name: String,
    pub export_date: DateTime<Utc>,
    pub row_count: usize,
}

/// GET /api/charts/:id/export
pub async fn export_chart(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let record = require_ready(&state, &id).await?;
    let kind = parse_kind(query.chart_type.as_deref())?;
    let columns = parse_columns(query.columns.as_deref());
    let limit = query.limit.unwrap_or(DEFAULT_EXPORT_LIMIT);

    let payload = project_chart(&state, &record, kind, columns, limit).await?;

    match query.format.as_deref().unwrap_or("json") {
        "json" => {
            let metadata = ExportMetadata {
                dataset_name: record.name.clone(),
                export_date: Utc::now(),
                row_count: payload.data.len(),
            };
            Ok(Json(ApiResponse::with_metadata(payload, metadata)).into_response())
        }
        "csv" => {
            let csv = payload.to_csv()?;
            let file_name = format!("{}_{}.csv", file_stem(&record.name), kind);
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", file_name),
                    ),
                ],
                csv,
            )
                .into_response())
        }
        other => Err(ApiError::BadRequest(format!(
            "Unknown export format: {}. Use json or csv.",
            other
        ))),
    }
}

/// File name without its final extension.
fn file_stem(name: &str) -> &str {
    name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind_defaults_to_bar() {
        assert_eq!(parse_kind(None).unwrap(), ChartKind::Bar);
        assert_eq!(parse_kind(Some("line")).unwrap(), ChartKind::Line);
        assert!(parse_kind(Some("sunburst")).is_err());
    }

    #[test]
    fn test_parse_columns_trims_and_drops_empty() {
        assert!(parse_columns(None).is_empty());
        assert_eq!(parse_columns(Some("a, b,,c ")), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("sales.csv"), "sales");
        assert_eq!(file_stem("archive.tar.gz"), "archive.tar");
        assert_eq!(file_stem("noext"), "noext");
    }
}
