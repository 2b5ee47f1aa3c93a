//! Status handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{AppError, AppState, CacheStatus};

/// GET /api/health - Liveness check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Dataset and reference overview for populating dashboard controls
#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub years: Vec<i32>,
    pub countries: usize,
    pub regions: Vec<String>,
    pub records: usize,
    pub cache: Option<CacheStatus>,
    pub default_clusters: usize,
    pub default_top_n: usize,
    pub high_inflation_threshold: f64,
}

/// GET /api/meta - Years, regions and cache status
pub async fn meta(State(state): State<Arc<AppState>>) -> Result<Json<MetaResponse>, AppError> {
    let dataset = state.store.current().await?;
    let analysis = &state.config.analysis;

    Ok(Json(MetaResponse {
        years: dataset.years(),
        countries: dataset.mappable_countries(&state.reference).len(),
        regions: state.reference.regions(),
        records: dataset.len(),
        cache: state.store.status().await,
        default_clusters: analysis.clusters,
        default_top_n: analysis.top_n,
        high_inflation_threshold: analysis.high_inflation_threshold,
    }))
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub records: usize,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// POST /api/refresh - Re-fetch the dataset now
pub async fn refresh(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshResponse>, AppError> {
    let dataset = state.store.refresh().await?;
    let fetched_at = state.store.status().await.map(|s| s.fetched_at);

    Ok(Json(RefreshResponse {
        records: dataset.len(),
        fetched_at,
    }))
}
