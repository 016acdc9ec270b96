//! Insight handlers: listing, generation, summary, editing.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use augur::{Augur, Insight, InsightType};

use super::datasets::require_ready;
use super::ApiResponse;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Default number of insights returned by the listing.
const DEFAULT_INSIGHT_LIMIT: usize = 20;

/// Query parameters for the insight listing.
#[derive(Deserialize)]
pub struct InsightQuery {
    #[serde(rename = "type")]
    pub insight_type: Option<String>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

/// GET /api/insights/:id
pub async fn get_insights(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<InsightQuery>,
) -> Result<Json<ApiResponse<Vec<Insight>>>, ApiError> {
    let record = require_ready(&state, &id).await?;

    let kind = match query.insight_type.as_deref() {
        Some(kind) => Some(kind.parse::<InsightType>().map_err(ApiError::BadRequest)?),
        None => None,
    };
    let limit = query.limit.unwrap_or(DEFAULT_INSIGHT_LIMIT);

    let mut insights: Vec<Insight> = record
        .insights
        .into_iter()
        .filter(|i| i.is_active)
        .filter(|i| kind.map_or(true, |k| i.insight_type == k))
        .filter(|i| match query.category.as_deref() {
            Some(category) => i.category.as_str() == category,
            None => true,
        })
        .collect();
    insights.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
    insights.truncate(limit);

    Ok(Json(ApiResponse::new(insights)))
}

/// Request body for insight generation.
#[derive(Deserialize, Default)]
pub struct GenerateRequest {
    pub types: Option<Vec<String>>,
}

/// POST /api/insights/:id/generate
///
/// Re-runs the selected detectors and replaces the stored insight set.
pub async fn generate_insights(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<GenerateRequest>>,
) -> Result<Json<ApiResponse<Vec<Insight>>>, ApiError> {
    let record = require_ready(&state, &id).await?;

    let kinds: Vec<InsightType> = body
        .map(|Json(req)| req)
        .unwrap_or_default()
        .types
        .unwrap_or_default()
        .iter()
        .map(|s| s.parse::<InsightType>())
        .collect::<Result<_, _>>()
        .map_err(ApiError::BadRequest)?;

    let engine: Arc<Augur> = Arc::clone(&state.engine);
    let path = record.file_path.clone();
    let insights = tokio::task::spawn_blocking(move || engine.insights(&path, &kinds))
        .await
        .map_err(|e| ApiError::Internal(format!("insight task: {}", e)))?
        .map_err(ApiError::from)?;

    let stored = insights.clone();
    state
        .update(&id, move |record| {
            record.insights = stored;
        })
        .await;

    Ok(Json(ApiResponse::new(insights)))
}

/// Aggregate view over a dataset's active insights.
#[derive(Serialize)]
pub struct InsightSummary {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_severity: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
    pub average_confidence: f64,
}

/// GET /api/insights/:id/summary
pub async fn get_insight_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<InsightSummary>>, ApiError> {
    let record = require_ready(&state, &id).await?;
    let active: Vec<&Insight> = record.insights.iter().filter(|i| i.is_active).collect();

    let mut by_type = BTreeMap::new();
    let mut by_severity = BTreeMap::new();
    let mut by_category = BTreeMap::new();
    for insight in &active {
        *by_type
            .entry(insight.insight_type.as_str().to_string())
            .or_insert(0) += 1;
        *by_severity
            .entry(insight.severity.as_str().to_string())
            .or_insert(0) += 1;
        *by_category
            .entry(insight.category.as_str().to_string())
            .or_insert(0) += 1;
    }

    let total = active.len();
    let average_confidence = if total == 0 {
        0.0
    } else {
        active.iter().map(|i| i.confidence).sum::<f64>() / total as f64
    };

    Ok(Json(ApiResponse::new(InsightSummary {
        total,
        by_type,
        by_severity,
        by_category,
        average_confidence,
    })))
}

/// Request body for editing an insight. Absent fields are left unchanged.
#[derive(Deserialize)]
pub struct UpdateInsightRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// PUT /api/insights/:id/:insight_id
pub async fn update_insight(
    State(state): State<AppState>,
    Path((id, insight_id)): Path<(String, String)>,
    Json(req): Json<UpdateInsightRequest>,
) -> Result<Json<ApiResponse<Insight>>, ApiError> {
    edit_insight(&state, &id, &insight_id, move |insight| {
        if let Some(title) = req.title {
            insight.title = title;
        }
        if let Some(description) = req.description {
            insight.description = description;
        }
        if let Some(tags) = req.tags {
            insight.tags = tags;
        }
        if let Some(is_active) = req.is_active {
            insight.is_active = is_active;
        }
    })
    .await
}

/// DELETE /api/insights/:id/:insight_id
///
/// Soft delete: the insight stays stored with `is_active = false`.
pub async fn delete_insight(
    State(state): State<AppState>,
    Path((id, insight_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Insight>>, ApiError> {
    edit_insight(&state, &id, &insight_id, |insight| {
        insight.is_active = false;
    })
    .await
}

/// Apply an edit to one stored insight and return the updated copy.
async fn edit_insight<F>(
    state: &AppState,
    id: &str,
    insight_id: &str,
    edit: F,
) -> Result<Json<ApiResponse<Insight>>, ApiError>
where
    F: FnOnce(&mut Insight),
{
    let mut datasets = state.datasets.write().await;
    let record = datasets
        .get_mut(id)
        .ok_or_else(|| ApiError::NotFound(format!("Dataset not found: {}", id)))?;
    let insight = record
        .insights
        .iter_mut()
        .find(|i| i.id == insight_id)
        .ok_or_else(|| ApiError::NotFound(format!("Insight not found: {}", insight_id)))?;

    edit(insight);
    Ok(Json(ApiResponse::new(insight.clone())))
}
