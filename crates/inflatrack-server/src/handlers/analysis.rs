//! Pattern analysis and comparison handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use inflatrack_core::patterns::{cluster_matrix, profiles, similar_in_matrix};
use inflatrack_core::selection::parse_list;
use inflatrack_core::stats::MAX_COMPARE;
use inflatrack_core::{
    compare as compare_series, country_stats as stats_for, ClusterProfile, CompareOptions,
    ComparisonSeries, CountryStats, KMeansOptions, MatchStrength, TrajectoryMatrix,
};

use super::{check_range, parse_regions};
use crate::{AppError, AppState};

/// Query parameters for clustering
#[derive(Debug, Deserialize)]
pub struct ClustersQuery {
    /// Number of clusters (default from config)
    pub k: Option<usize>,
    /// Comma-separated region filter
    pub regions: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClustersResponse {
    pub k: usize,
    pub inertia: f64,
    pub clusters: Vec<ClusterProfile>,
}

/// GET /api/clusters - Group countries by trajectory shape
pub async fn clusters(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClustersQuery>,
) -> Result<Json<ClustersResponse>, AppError> {
    let dataset = state.store.current().await?;
    let regions = parse_regions(params.regions.as_deref(), &state.reference)?;

    let mut options = KMeansOptions::from(&state.config.analysis);
    if let Some(k) = params.k {
        options = options.with_k(k);
    }

    let filtered = dataset.in_regions(&regions, &state.reference);
    let matrix = TrajectoryMatrix::build(&filtered, &state.reference);
    let assignment = cluster_matrix(&matrix, &options)?;

    Ok(Json(ClustersResponse {
        k: assignment.k,
        inertia: assignment.inertia,
        clusters: profiles(&assignment, &matrix),
    }))
}

/// Query parameters for similarity search
#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub country: String,
    /// Number of matches (default from config)
    pub top: Option<usize>,
    /// Comma-separated region filter for the candidate pool
    pub regions: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SimilarEntry {
    pub country: String,
    pub score: f64,
    pub strength: MatchStrength,
}

/// GET /api/similar - Countries with the most similar trajectories
pub async fn similar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SimilarQuery>,
) -> Result<Json<Vec<SimilarEntry>>, AppError> {
    let dataset = state.store.current().await?;
    let regions = parse_regions(params.regions.as_deref(), &state.reference)?;
    let top = params.top.unwrap_or(state.config.analysis.top_n);

    let filtered = dataset.in_regions(&regions, &state.reference);
    let matrix = TrajectoryMatrix::build(&filtered, &state.reference);
    let ranked = similar_in_matrix(&matrix, &params.country, top)?;

    Ok(Json(
        ranked
            .into_iter()
            .map(|s| SimilarEntry {
                strength: s.strength(),
                country: s.country,
                score: s.score,
            })
            .collect(),
    ))
}

/// Query parameters for the comparison chart
#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    /// Comma-separated country list
    pub countries: String,
    pub from: Option<i32>,
    pub to: Option<i32>,
    /// Rebase each series to 100 at its first value
    #[serde(default)]
    pub normalize: bool,
    /// Add a centered 3-year rolling mean
    #[serde(default)]
    pub rolling: bool,
    /// Year for the `current` stat
    pub year: Option<i32>,
}

/// GET /api/compare - Side-by-side series for several countries
pub async fn compare(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CompareQuery>,
) -> Result<Json<Vec<ComparisonSeries>>, AppError> {
    let countries = parse_list(&params.countries);
    if countries.is_empty() {
        return Err(AppError::bad_request("At least one country is required"));
    }
    if countries.len() > MAX_COMPARE {
        return Err(AppError::bad_request(&format!(
            "At most {} countries can be compared",
            MAX_COMPARE
        )));
    }
    check_range(params.from, params.to)?;

    let dataset = state.store.current().await?;
    let options = CompareOptions {
        from: params.from,
        to: params.to,
        normalize: params.normalize,
        rolling: params.rolling,
        year: params.year,
    };

    Ok(Json(compare_series(&dataset, &countries, &options)))
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub year: Option<i32>,
}

/// GET /api/countries/:name/stats - Summary statistics for one country
pub async fn country_stats(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<CountryStats>, AppError> {
    let dataset = state.store.current().await?;
    let stats = stats_for(&dataset, &name, params.year)?;
    Ok(Json(stats))
}
