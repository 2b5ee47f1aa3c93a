//! Domain models for inflatrack

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::reference::CountryReference;

/// One year-on-year inflation observation for a country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflationRecord {
    /// Country name as published by the data source
    pub country: String,
    /// ISO 3166-1 alpha-3 code
    pub country_code: String,
    pub year: i32,
    /// Annual change in consumer prices, percent
    pub inflation: f64,
}

impl InflationRecord {
    pub fn new(country: &str, country_code: &str, year: i32, inflation: f64) -> Self {
        Self {
            country: country.to_string(),
            country_code: country_code.to_string(),
            year,
            inflation,
        }
    }
}

/// The full long-format inflation table
///
/// Records are unordered; every query returns owned, freshly ordered data so
/// the table itself stays immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<InflationRecord>,
}

impl Dataset {
    pub fn new(records: Vec<InflationRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[InflationRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<InflationRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct years
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted distinct country names
    pub fn countries(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.country.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// All records for one country, ascending by year
    pub fn for_country(&self, country: &str) -> Vec<&InflationRecord> {
        let mut rows: Vec<&InflationRecord> = self
            .records
            .iter()
            .filter(|r| r.country == country)
            .collect();
        rows.sort_by_key(|r| r.year);
        rows
    }

    /// Inflation value for a (country, year) pair, averaging duplicates
    pub fn value(&self, country: &str, year: i32) -> Option<f64> {
        let values: Vec<f64> = self
            .records
            .iter()
            .filter(|r| r.country == country && r.year == year)
            .map(|r| r.inflation)
            .collect();
        mean(&values)
    }

    /// Records with `from <= year <= to`; open bounds when `None`
    pub fn in_years(&self, from: Option<i32>, to: Option<i32>) -> Dataset {
        let records = self
            .records
            .iter()
            .filter(|r| from.map_or(true, |f| r.year >= f) && to.map_or(true, |t| r.year <= t))
            .cloned()
            .collect();
        Dataset::new(records)
    }

    /// Records whose country belongs to one of `regions`
    ///
    /// An empty region list means "all regions" and keeps every record,
    /// including countries with no known region.
    pub fn in_regions(&self, regions: &[String], reference: &CountryReference) -> Dataset {
        if regions.is_empty() {
            return self.clone();
        }
        let records = self
            .records
            .iter()
            .filter(|r| {
                reference
                    .region(&r.country)
                    .is_some_and(|region| regions.iter().any(|sel| sel == region))
            })
            .cloned()
            .collect();
        Dataset::new(records)
    }

    /// Countries that have data and are known to the reference table
    pub fn mappable_countries(&self, reference: &CountryReference) -> Vec<String> {
        self.countries()
            .into_iter()
            .filter(|c| reference.contains(c))
            .collect()
    }

    /// Mean inflation per (country, year), duplicates averaged
    pub(crate) fn averaged_cells(&self) -> BTreeMap<(&str, i32), f64> {
        let mut sums: BTreeMap<(&str, i32), (f64, usize)> = BTreeMap::new();
        for r in &self.records {
            let entry = sums.entry((r.country.as_str(), r.year)).or_insert((0.0, 0));
            entry.0 += r.inflation;
            entry.1 += 1;
        }
        sums.into_iter()
            .map(|(key, (sum, n))| (key, sum / n as f64))
            .collect()
    }
}

impl From<Vec<InflationRecord>> for Dataset {
    fn from(records: Vec<InflationRecord>) -> Self {
        Self::new(records)
    }
}

/// RGBA color, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgba(pub [u8; 4]);

/// Discrete inflation color bands for the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorBand {
    /// Below 0%
    Deflation,
    /// 0% up to 2%
    Low,
    /// 2% up to 5%
    Moderate,
    /// 5% up to 10%
    High,
    /// 10% and above
    VeryHigh,
}

impl ColorBand {
    /// Band for an inflation value; bounds are inclusive below, exclusive above
    pub fn for_inflation(inflation: f64) -> Self {
        if inflation < 0.0 {
            Self::Deflation
        } else if inflation < 2.0 {
            Self::Low
        } else if inflation < 5.0 {
            Self::Moderate
        } else if inflation < 10.0 {
            Self::High
        } else {
            // NaN also lands here
            Self::VeryHigh
        }
    }

    /// Blue -> green -> yellow -> orange -> red
    pub fn color(&self) -> Rgba {
        match self {
            Self::Deflation => Rgba([0, 100, 255, 200]),
            Self::Low => Rgba([0, 200, 100, 200]),
            Self::Moderate => Rgba([255, 200, 0, 200]),
            Self::High => Rgba([255, 100, 0, 200]),
            Self::VeryHigh => Rgba([255, 0, 0, 200]),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deflation => "deflation",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

impl std::fmt::Display for ColorBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A map-ready row for one country in the selected year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRow {
    pub country: String,
    pub country_code: String,
    pub inflation: f64,
    pub lat: f64,
    pub lon: f64,
    pub color: Rgba,
    /// Column height, `|inflation| * 10000`
    pub elevation: f64,
}

/// Headline figures for a projected year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSummary {
    pub countries: usize,
    pub average: f64,
    pub highest: CountryValue,
    pub lowest: CountryValue,
}

/// A country paired with a single value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryValue {
    pub country: String,
    pub value: f64,
}

/// One point of an inflation-adjusted value series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustedPoint {
    pub year: i32,
    /// Compounded price index, 100 at the start year
    pub price_index: f64,
    /// Amount needed in `year` to match the initial amount's purchasing power
    pub adjusted_value: f64,
}

/// Purchasing-power trajectory for one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedSeries {
    pub country: String,
    pub start_year: i32,
    pub end_year: i32,
    pub initial_amount: f64,
    pub points: Vec<AdjustedPoint>,
}

impl AdjustedSeries {
    /// Adjusted value at the last available year
    pub fn final_value(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.adjusted_value)
            .unwrap_or(self.initial_amount)
    }

    /// Total percent change from the initial amount; `None` for a zero amount
    pub fn cumulative_inflation(&self) -> Option<f64> {
        if self.initial_amount == 0.0 {
            return None;
        }
        Some((self.final_value() - self.initial_amount) / self.initial_amount * 100.0)
    }
}

/// A country ranked by trajectory similarity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Similarity {
    pub country: String,
    /// Cosine similarity in [-1, 1]
    pub score: f64,
}

impl Similarity {
    pub fn strength(&self) -> MatchStrength {
        MatchStrength::for_score(self.score)
    }
}

/// Qualitative bucket for a similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrength {
    Strong,
    Good,
    Weak,
}

impl MatchStrength {
    pub fn for_score(score: f64) -> Self {
        if score > 0.95 {
            Self::Strong
        } else if score > 0.85 {
            Self::Good
        } else {
            Self::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Good => "good",
            Self::Weak => "weak",
        }
    }
}

impl std::fmt::Display for MatchStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Country to cluster id mapping produced by k-means
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub k: usize,
    /// Total within-cluster squared distance of the winning run
    pub inertia: f64,
    pub assignments: BTreeMap<String, usize>,
}

impl ClusterAssignment {
    pub fn cluster_of(&self, country: &str) -> Option<usize> {
        self.assignments.get(country).copied()
    }

    /// Countries in a cluster, alphabetically
    pub fn members(&self, id: usize) -> Vec<&str> {
        self.assignments
            .iter()
            .filter(|(_, &c)| c == id)
            .map(|(country, _)| country.as_str())
            .collect()
    }
}

/// Members and mean raw inflation of one cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterProfile {
    pub id: usize,
    pub members: Vec<String>,
    pub mean_inflation: f64,
}

/// Descriptive statistics for one country's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryStats {
    pub country: String,
    /// Value in the requested year, if observed
    pub current: Option<f64>,
    pub mean: f64,
    pub max: f64,
    /// First year the maximum was reached
    pub max_year: i32,
    pub min: f64,
    /// First year the minimum was reached
    pub min_year: i32,
    /// Sample standard deviation; `None` with fewer than two observations
    pub volatility: Option<f64>,
    pub observations: usize,
}

/// One country's line in a comparison chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSeries {
    pub country: String,
    pub years: Vec<i32>,
    /// Raw or normalized values, aligned with `years`
    pub values: Vec<f64>,
    /// Centered rolling mean, aligned with `years`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rolling: Option<Vec<Option<f64>>>,
    pub stats: CountryStats,
}

/// Arithmetic mean, `None` when empty
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
