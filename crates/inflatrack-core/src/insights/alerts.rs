//! Threshold alerts over the projected year

use super::engine::{InsightCheck, InsightContext};
use super::types::{Insight, InsightKind, Severity};

/// Countries with inflation strictly above the high threshold
pub struct HighInflationCheck;

impl InsightCheck for HighInflationCheck {
    fn kind(&self) -> InsightKind {
        InsightKind::HighInflation
    }

    fn name(&self) -> &'static str {
        "High Inflation Alert"
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Insight> {
        let count = ctx
            .rows
            .iter()
            .filter(|r| r.inflation > ctx.high_threshold)
            .count();
        if count == 0 {
            return None;
        }

        Some(Insight::new(
            self.kind(),
            Severity::Alert,
            self.name(),
            format!(
                "{} countries are experiencing inflation above {}% in {}.",
                count, ctx.high_threshold, ctx.year
            ),
        ))
    }
}

/// Countries with negative inflation
pub struct DeflationCheck;

impl InsightCheck for DeflationCheck {
    fn kind(&self) -> InsightKind {
        InsightKind::Deflation
    }

    fn name(&self) -> &'static str {
        "Deflation Alert"
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Insight> {
        let count = ctx.rows.iter().filter(|r| r.inflation < 0.0).count();
        if count == 0 {
            return None;
        }

        Some(Insight::new(
            self.kind(),
            Severity::Warning,
            self.name(),
            format!(
                "{} countries are experiencing deflation in {}.",
                count, ctx.year
            ),
        ))
    }
}
