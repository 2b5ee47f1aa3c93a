//! Purchasing-power calculator handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use inflatrack_core::{adjust as adjust_series, AdjustedSeries};

use super::check_range;
use crate::{AppError, AppState};

/// Default amount for the calculator
const DEFAULT_AMOUNT: f64 = 1000.0;

#[derive(Debug, Deserialize)]
pub struct AdjustQuery {
    pub country: String,
    pub from: i32,
    pub to: i32,
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct AdjustResponse {
    #[serde(flatten)]
    pub series: AdjustedSeries,
    pub final_value: f64,
    /// Percent change of the final value over the initial amount
    pub cumulative_inflation: Option<f64>,
}

/// GET /api/adjust - Inflation-adjusted value of an amount over a year range
pub async fn adjust(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AdjustQuery>,
) -> Result<Json<AdjustResponse>, AppError> {
    check_range(Some(params.from), Some(params.to))?;
    let amount = params.amount.unwrap_or(DEFAULT_AMOUNT);
    if !amount.is_finite() {
        return Err(AppError::bad_request("amount must be a finite number"));
    }

    let dataset = state.store.current().await?;
    let series = adjust_series(&dataset, &params.country, params.from, params.to, amount)?;

    Ok(Json(AdjustResponse {
        final_value: series.final_value(),
        cumulative_inflation: series.cumulative_inflation(),
        series,
    }))
}
