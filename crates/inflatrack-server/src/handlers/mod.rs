//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analysis;
pub mod calculator;
pub mod export;
pub mod insights;
pub mod map;
pub mod meta;

// Re-export all handlers for use in router
pub use analysis::*;
pub use calculator::*;
pub use export::*;
pub use insights::*;
pub use map::*;
pub use meta::*;

use inflatrack_core::selection::parse_list;
use inflatrack_core::{CountryReference, Dataset};

use crate::AppError;

/// Parse a comma-separated region filter, rejecting unknown regions
pub(crate) fn parse_regions(
    raw: Option<&str>,
    reference: &CountryReference,
) -> Result<Vec<String>, AppError> {
    let regions = raw.map(parse_list).unwrap_or_default();
    let known = reference.regions();
    if let Some(unknown) = regions.iter().find(|r| !known.contains(r)) {
        return Err(AppError::bad_request(&format!(
            "Unknown region '{}'. Valid regions: {}",
            unknown,
            known.join(", ")
        )));
    }
    Ok(regions)
}

/// The requested year, or the latest year with data
pub(crate) fn resolve_year(dataset: &Dataset, year: Option<i32>) -> Result<i32, AppError> {
    match year {
        Some(year) => Ok(year),
        None => dataset
            .years()
            .last()
            .copied()
            .ok_or_else(|| AppError::not_found("No data available")),
    }
}

/// Reject `from > to`
pub(crate) fn check_range(from: Option<i32>, to: Option<i32>) -> Result<(), AppError> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(AppError::bad_request(&format!(
            "Invalid year range: {} is after {}",
            from, to
        ))),
        _ => Ok(()),
    }
}
