//! Regional insights
//!
//! - Average inflation across the selected regions
//! - The region with the highest average inflation on the map

use std::collections::BTreeMap;

use crate::models::mean;

use super::engine::{InsightCheck, InsightContext};
use super::types::{Insight, InsightKind, Severity};

/// Mean inflation across the projected rows when regions are selected
pub struct RegionalAverageCheck;

impl InsightCheck for RegionalAverageCheck {
    fn kind(&self) -> InsightKind {
        InsightKind::RegionalAverage
    }

    fn name(&self) -> &'static str {
        "Regional Analysis"
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Insight> {
        if ctx.regions.is_empty() {
            return None;
        }
        let values: Vec<f64> = ctx.rows.iter().map(|r| r.inflation).collect();
        let average = mean(&values)?;

        Some(Insight::new(
            self.kind(),
            Severity::Info,
            self.name(),
            format!(
                "In {}, the selected regions have an average inflation rate of {:.2}%.",
                ctx.year, average
            ),
        ))
    }
}

/// Region with the highest mean inflation among the projected rows
pub struct GeographicPatternCheck;

impl InsightCheck for GeographicPatternCheck {
    fn kind(&self) -> InsightKind {
        InsightKind::GeographicPattern
    }

    fn name(&self) -> &'static str {
        "Geographic Pattern"
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Insight> {
        let mut by_region: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for row in ctx.rows {
            if let Some(region) = ctx.reference.region(&row.country) {
                by_region.entry(region).or_default().push(row.inflation);
            }
        }

        // Ties resolve to the alphabetically first region
        let (region, average) = by_region
            .iter()
            .filter_map(|(region, values)| mean(values).map(|m| (*region, m)))
            .fold(None, |best: Option<(&str, f64)>, (region, m)| match best {
                Some((_, b)) if b >= m => best,
                _ => Some((region, m)),
            })?;

        Some(Insight::new(
            self.kind(),
            Severity::Attention,
            self.name(),
            format!(
                "{} has the highest average inflation ({:.2}%) in {}.",
                region, average, ctx.year
            ),
        ))
    }
}
