//! Descriptive statistics and comparison series

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{mean, ComparisonSeries, CountryStats, Dataset};

/// Default rolling-average window, in years
pub const ROLLING_WINDOW: usize = 3;

/// Most countries one comparison may include
pub const MAX_COMPARE: usize = 10;

/// Sample standard deviation; `None` with fewer than two values
pub fn volatility(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

fn stats_for(country: &str, years: &[i32], values: &[f64], year: Option<i32>) -> Option<CountryStats> {
    let m = mean(values)?;
    let current = year.and_then(|y| {
        years
            .iter()
            .zip(values)
            .find(|(yr, _)| **yr == y)
            .map(|(_, v)| *v)
    });
    let (max_year, max) = extreme(years, values, |v, best| v > best)?;
    let (min_year, min) = extreme(years, values, |v, best| v < best)?;
    Some(CountryStats {
        country: country.to_string(),
        current,
        mean: m,
        max,
        max_year,
        min,
        min_year,
        volatility: volatility(values),
        observations: values.len(),
    })
}

/// Earliest `(year, value)` that no later value beats
fn extreme(years: &[i32], values: &[f64], beats: impl Fn(f64, f64) -> bool) -> Option<(i32, f64)> {
    years
        .iter()
        .copied()
        .zip(values.iter().copied())
        .reduce(|best, next| if beats(next.1, best.1) { next } else { best })
}

/// Summary of a country's full history, with its value in `year` if given
pub fn country_stats(dataset: &Dataset, country: &str, year: Option<i32>) -> Result<CountryStats> {
    let rows = dataset.for_country(country);
    let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    let values: Vec<f64> = rows.iter().map(|r| r.inflation).collect();
    stats_for(country, &years, &values, year)
        .ok_or_else(|| Error::NotFound(format!("no inflation data for {}", country)))
}

/// Centered moving average
///
/// Position `i` averages the `window` values centered on it; positions
/// without a full window are `None`.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if window == 0 {
                return None;
            }
            let start = i.checked_sub(window / 2)?;
            let end = start + window;
            if end > values.len() {
                return None;
            }
            mean(&values[start..end])
        })
        .collect()
}

/// Rescale so the first value reads 100
///
/// Other values become `100 + (v - first) / |first| * 100`; a zero first
/// value maps the whole series to 100.
pub fn normalize_to_base(values: &[f64]) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return vec![];
    };
    if first == 0.0 {
        return vec![100.0; values.len()];
    }
    values
        .iter()
        .map(|v| 100.0 + (v - first) / first.abs() * 100.0)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompareOptions {
    pub from: Option<i32>,
    pub to: Option<i32>,
    /// Rebase every series to 100 at its first year
    pub normalize: bool,
    /// Attach a 3-year centered average (raw series only)
    pub rolling: bool,
    /// Year reported as `current` in the stats
    pub year: Option<i32>,
}

/// One series per requested country with data in range
///
/// Countries without data are skipped; requests beyond `MAX_COMPARE`
/// countries are truncated.
pub fn compare(dataset: &Dataset, countries: &[String], options: &CompareOptions) -> Vec<ComparisonSeries> {
    let ranged = dataset.in_years(options.from, options.to);

    let series: Vec<ComparisonSeries> = countries
        .iter()
        .take(MAX_COMPARE)
        .filter_map(|country| {
            let rows = ranged.for_country(country);
            let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
            let raw: Vec<f64> = rows.iter().map(|r| r.inflation).collect();
            let stats = stats_for(country, &years, &raw, options.year)?;

            let rolling = (options.rolling && !options.normalize && raw.len() >= ROLLING_WINDOW)
                .then(|| rolling_mean(&raw, ROLLING_WINDOW));
            let values = if options.normalize {
                normalize_to_base(&raw)
            } else {
                raw
            };

            Some(ComparisonSeries {
                country: country.clone(),
                years,
                values,
                rolling,
                stats,
            })
        })
        .collect();

    debug!(
        requested = countries.len(),
        returned = series.len(),
        normalize = options.normalize,
        "Built comparison series"
    );
    series
}
