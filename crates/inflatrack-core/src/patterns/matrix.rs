//! Country × year trajectory matrix

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Dataset;
use crate::reference::CountryReference;

/// Dense matrix of mean inflation, one row per country, one column per year
///
/// Built from the long-format table: rows are the countries present in both
/// the data and the reference table (alphabetical), columns are every
/// distinct year in the data (ascending). Gaps in a row are filled forward,
/// then backward, then with 0, so no cell is ever missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryMatrix {
    pub countries: Vec<String>,
    pub years: Vec<i32>,
    pub values: Vec<Vec<f64>>,
}

impl TrajectoryMatrix {
    pub fn build(dataset: &Dataset, reference: &CountryReference) -> Self {
        let years = dataset.years();
        let countries = dataset.mappable_countries(reference);
        let cells = dataset.averaged_cells();

        let values: Vec<Vec<f64>> = countries
            .iter()
            .map(|country| {
                let raw: Vec<Option<f64>> = years
                    .iter()
                    .map(|&year| cells.get(&(country.as_str(), year)).copied())
                    .collect();
                fill_gaps(&raw)
            })
            .collect();

        debug!(
            rows = countries.len(),
            cols = years.len(),
            "Built trajectory matrix"
        );

        Self {
            countries,
            years,
            values,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.countries.len()
    }

    pub fn n_cols(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn index_of(&self, country: &str) -> Option<usize> {
        self.countries.binary_search_by(|c| c.as_str().cmp(country)).ok()
    }

    pub fn row(&self, country: &str) -> Option<&[f64]> {
        self.index_of(country).map(|i| self.values[i].as_slice())
    }

    /// Each column shifted to zero mean and scaled to unit variance
    ///
    /// Uses the population standard deviation; a constant column becomes
    /// all zeros.
    pub fn standardized(&self) -> Vec<Vec<f64>> {
        let n = self.n_rows();
        let mut out = self.values.clone();
        if n == 0 {
            return out;
        }

        for col in 0..self.n_cols() {
            let mean = self.values.iter().map(|row| row[col]).sum::<f64>() / n as f64;
            let var = self
                .values
                .iter()
                .map(|row| (row[col] - mean).powi(2))
                .sum::<f64>()
                / n as f64;
            let std = var.sqrt();

            for row in out.iter_mut() {
                row[col] = if std > f64::EPSILON {
                    (row[col] - mean) / std
                } else {
                    0.0
                };
            }
        }
        out
    }
}

/// Forward-fill, then backward-fill, then 0
fn fill_gaps(raw: &[Option<f64>]) -> Vec<f64> {
    let mut filled: Vec<Option<f64>> = raw.to_vec();

    let mut last = None;
    for cell in filled.iter_mut() {
        match cell {
            Some(v) => last = Some(*v),
            None => *cell = last,
        }
    }

    let mut next = None;
    for cell in filled.iter_mut().rev() {
        match cell {
            Some(v) => next = Some(*v),
            None => *cell = next,
        }
    }

    filled.into_iter().map(|c| c.unwrap_or(0.0)).collect()
}
