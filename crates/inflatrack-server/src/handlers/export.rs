//! Export handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use inflatrack_core::export::export_filename;
use inflatrack_core::selection::parse_list;
use inflatrack_core::{analysis_summary, export_csv, project, ExportOptions, Selection};

use super::{check_range, parse_regions, resolve_year};
use crate::{AppError, AppState};

/// Query parameters for data export
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub from: Option<i32>,
    pub to: Option<i32>,
    /// Comma-separated region filter
    pub regions: Option<String>,
}

/// GET /api/export - Filtered records as a CSV download
pub async fn export_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportQuery>,
) -> Result<Response, AppError> {
    check_range(params.from, params.to)?;
    let regions = parse_regions(params.regions.as_deref(), &state.reference)?;
    let dataset = state.store.current().await?;

    let options = ExportOptions {
        from: params.from,
        to: params.to,
        regions,
    };
    let csv = export_csv(&dataset, &options, &state.reference)?;
    let filename = export_filename(&dataset, &options);

    let lines = csv.lines().count().saturating_sub(1);
    info!("Exported {} records to CSV", lines);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(csv))
        .map_err(|e| AppError::internal(&e.to_string()))
}

/// Query parameters for the analysis summary
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub year: Option<i32>,
    pub regions: Option<String>,
    pub country: Option<String>,
    pub from: Option<i32>,
    pub to: Option<i32>,
    /// Comma-separated comparison countries
    pub compare: Option<String>,
}

/// GET /api/export/summary - Plain-text description of the active filters
pub async fn export_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryQuery>,
) -> Result<Response, AppError> {
    check_range(params.from, params.to)?;
    let regions = parse_regions(params.regions.as_deref(), &state.reference)?;
    let dataset = state.store.current().await?;
    let year = resolve_year(&dataset, params.year)?;

    let selection = Selection::for_year(year)
        .with_regions(regions)
        .with_country(params.country)
        .with_range(params.from, params.to)
        .with_compare(params.compare.as_deref().map(parse_list).unwrap_or_default());
    let filtered = selection.apply(&dataset, &state.reference);
    let shown = project(&filtered, year, &state.reference).len();

    let text = analysis_summary(&selection, &dataset, shown, Utc::now());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"inflation_summary_{}.txt\"",
                Utc::now().format("%Y-%m-%d")
            ),
        )
        .body(Body::from(text))
        .map_err(|e| AppError::internal(&e.to_string()))
}
