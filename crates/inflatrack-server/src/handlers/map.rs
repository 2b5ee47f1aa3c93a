//! Map handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use inflatrack_core::{
    apply_highlights, cluster, project, summarize, HighlightOptions, KMeansOptions, MapRow,
    MapSummary,
};

use super::{parse_regions, resolve_year};
use crate::{AppError, AppState};

/// Query parameters for the map layer
#[derive(Debug, Default, Deserialize)]
pub struct MapQuery {
    /// Year to show (default: latest year with data)
    pub year: Option<i32>,
    /// Comma-separated region filter
    pub regions: Option<String>,
    /// Country to highlight
    pub country: Option<String>,
    /// Highlight countries above the high-inflation threshold
    #[serde(default)]
    pub highlight_high: bool,
    /// Highlight countries in deflation
    #[serde(default)]
    pub highlight_deflation: bool,
    /// Color countries by trajectory cluster
    #[serde(default)]
    pub clusters: bool,
}

/// GET /api/map - Map-ready rows for one year
pub async fn map(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MapQuery>,
) -> Result<Json<Vec<MapRow>>, AppError> {
    let dataset = state.store.current().await?;
    let regions = parse_regions(params.regions.as_deref(), &state.reference)?;
    let year = resolve_year(&dataset, params.year)?;

    let filtered = dataset.in_regions(&regions, &state.reference);
    let mut rows = project(&filtered, year, &state.reference);

    let assignment = if params.clusters {
        let options = KMeansOptions::from(&state.config.analysis);
        match cluster(&filtered, &state.reference, &options) {
            Ok(assignment) => Some(assignment),
            Err(e) => {
                warn!(error = %e, "Cluster coloring skipped");
                None
            }
        }
    } else {
        None
    };

    let highlights = HighlightOptions {
        high_threshold: params
            .highlight_high
            .then_some(state.config.analysis.high_inflation_threshold),
        deflation: params.highlight_deflation,
        selected_country: params.country,
    };
    apply_highlights(&mut rows, &highlights, assignment.as_ref());

    Ok(Json(rows))
}

/// Query parameters for the map summary
#[derive(Debug, Deserialize)]
pub struct MapSummaryQuery {
    pub year: Option<i32>,
    pub regions: Option<String>,
}

/// GET /api/map/summary - Average, highest and lowest for one year
pub async fn map_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MapSummaryQuery>,
) -> Result<Json<MapSummary>, AppError> {
    let dataset = state.store.current().await?;
    let regions = parse_regions(params.regions.as_deref(), &state.reference)?;
    let year = resolve_year(&dataset, params.year)?;

    let filtered = dataset.in_regions(&regions, &state.reference);
    let rows = project(&filtered, year, &state.reference);
    let summary = summarize(&rows)
        .ok_or_else(|| AppError::not_found(&format!("No map data for {}", year)))?;

    Ok(Json(summary))
}
