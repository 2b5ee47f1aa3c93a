//! Insight Engine - runs registered checks against a selection

use crate::models::{Dataset, MapRow};
use crate::reference::CountryReference;
use crate::selection::Selection;

use super::types::{Insight, InsightKind};
use super::{
    CountryTrendCheck, DeflationCheck, GeographicPatternCheck, HighInflationCheck,
    RegionalAverageCheck,
};

/// Default threshold for the high-inflation alert, percent
pub const HIGH_INFLATION_THRESHOLD: f64 = 10.0;

/// Everything a check may look at
pub struct InsightContext<'a> {
    /// Projected rows for `year`
    pub rows: &'a [MapRow],
    /// Table the rows were projected from; used for country history
    pub dataset: &'a Dataset,
    pub reference: &'a CountryReference,
    pub year: i32,
    pub regions: &'a [String],
    pub country: Option<&'a str>,
    pub high_threshold: f64,
}

impl<'a> InsightContext<'a> {
    pub fn new(
        rows: &'a [MapRow],
        dataset: &'a Dataset,
        reference: &'a CountryReference,
        year: i32,
    ) -> Self {
        Self {
            rows,
            dataset,
            reference,
            year,
            regions: &[],
            country: None,
            high_threshold: HIGH_INFLATION_THRESHOLD,
        }
    }

    /// Context for the year, regions and country of a selection
    pub fn from_selection(
        selection: &'a Selection,
        rows: &'a [MapRow],
        dataset: &'a Dataset,
        reference: &'a CountryReference,
    ) -> Self {
        Self {
            regions: &selection.regions,
            country: selection.country.as_deref(),
            ..Self::new(rows, dataset, reference, selection.year)
        }
    }

    pub fn with_regions(mut self, regions: &'a [String]) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_country(mut self, country: Option<&'a str>) -> Self {
        self.country = country;
        self
    }

    pub fn with_high_threshold(mut self, threshold: f64) -> Self {
        self.high_threshold = threshold;
        self
    }
}

/// A single independent fact check
///
/// A check whose precondition does not hold returns `None`; it never emits
/// placeholder text.
pub trait InsightCheck: Send + Sync {
    fn kind(&self) -> InsightKind;

    /// Human-readable name
    fn name(&self) -> &'static str;

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Insight>;
}

/// Runs checks in registration order
pub struct InsightEngine {
    checks: Vec<Box<dyn InsightCheck>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Engine with the built-in checks
    pub fn new() -> Self {
        let mut engine = Self::empty();

        engine.register(Box::new(RegionalAverageCheck));
        engine.register(Box::new(GeographicPatternCheck));
        engine.register(Box::new(CountryTrendCheck));
        engine.register(Box::new(HighInflationCheck));
        engine.register(Box::new(DeflationCheck));

        engine
    }

    pub fn empty() -> Self {
        Self { checks: vec![] }
    }

    pub fn register(&mut self, check: Box<dyn InsightCheck>) {
        self.checks.push(check);
    }

    pub fn kinds(&self) -> Vec<InsightKind> {
        self.checks.iter().map(|c| c.kind()).collect()
    }

    /// Evaluate every check; output order follows registration order
    pub fn run(&self, ctx: &InsightContext<'_>) -> Vec<Insight> {
        let mut insights = vec![];

        for check in &self.checks {
            match check.evaluate(ctx) {
                Some(insight) => {
                    tracing::debug!(check = check.kind().as_str(), "Insight produced");
                    insights.push(insight);
                }
                None => {
                    tracing::debug!(check = check.name(), "Insight check skipped");
                }
            }
        }

        insights
    }
}

/// Run the built-in checks
pub fn generate_insights(ctx: &InsightContext<'_>) -> Vec<Insight> {
    InsightEngine::new().run(ctx)
}
