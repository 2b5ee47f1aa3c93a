//! Insight handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use inflatrack_core::{generate_insights, project, Insight, InsightContext, Selection};

use super::{parse_regions, resolve_year};
use crate::{AppError, AppState};

/// Query parameters for insights
#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    pub year: Option<i32>,
    /// Comma-separated region filter
    pub regions: Option<String>,
    /// Country for the trend statement
    pub country: Option<String>,
}

/// GET /api/insights - Fact statements for the current selection
///
/// The trend statement reads the focus country's whole history, so the
/// table is only narrowed by region here.
pub async fn insights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InsightsQuery>,
) -> Result<Json<Vec<Insight>>, AppError> {
    let dataset = state.store.current().await?;
    let regions = parse_regions(params.regions.as_deref(), &state.reference)?;
    let year = resolve_year(&dataset, params.year)?;

    let selection = Selection::for_year(year)
        .with_regions(regions)
        .with_country(params.country);
    let filtered = dataset.in_regions(&selection.regions, &state.reference);
    let rows = project(&filtered, year, &state.reference);

    let ctx = InsightContext::from_selection(&selection, &rows, &filtered, &state.reference)
        .with_high_threshold(state.config.analysis.high_inflation_threshold);

    Ok(Json(generate_insights(&ctx)))
}
