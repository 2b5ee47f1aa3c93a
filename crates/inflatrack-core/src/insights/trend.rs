//! Country trend insight
//!
//! Compares the mean of a country's last three observations with the mean
//! of its first three (two each when only two or three years exist).

use crate::models::mean;

use super::engine::{InsightCheck, InsightContext};
use super::types::{Insight, InsightKind, Severity, TrendDirection};

/// Observations averaged at each end of the history
const WINDOW: usize = 3;

pub struct CountryTrendCheck;

/// Earlier and recent means for a year-ordered series
fn endpoint_means(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let window = if values.len() >= WINDOW { WINDOW } else { 2 };
    let earlier = mean(&values[..window])?;
    let recent = mean(&values[values.len() - window..])?;
    Some((earlier, recent))
}

impl InsightCheck for CountryTrendCheck {
    fn kind(&self) -> InsightKind {
        InsightKind::CountryTrend
    }

    fn name(&self) -> &'static str {
        "Trend Alert"
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Insight> {
        let country = ctx.country?;
        let values: Vec<f64> = ctx
            .dataset
            .for_country(country)
            .iter()
            .map(|r| r.inflation)
            .collect();
        let (earlier, recent) = endpoint_means(&values)?;
        let direction = TrendDirection::classify(earlier, recent);

        let severity = match direction {
            TrendDirection::Increased => Severity::Warning,
            TrendDirection::Decreased | TrendDirection::Stable => Severity::Info,
        };

        Some(Insight::new(
            self.kind(),
            severity,
            self.name(),
            format!(
                "Inflation in {} has generally {} over the available period.",
                country,
                direction.phrase()
            ),
        ))
    }
}
