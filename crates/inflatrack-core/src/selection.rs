//! Request context for analytic calls
//!
//! A `Selection` carries the filters a caller has chosen (year, regions,
//! focus country, year range, comparison set). It is built once per request
//! and passed by reference; analytics never hold on to it.

use serde::{Deserialize, Serialize};

use crate::models::Dataset;
use crate::reference::CountryReference;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Year shown on the map
    pub year: i32,
    /// Region filter; empty means all regions
    #[serde(default)]
    pub regions: Vec<String>,
    /// Focus country for trend statements and highlighting
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub year_from: Option<i32>,
    #[serde(default)]
    pub year_to: Option<i32>,
    /// Countries in the comparison chart
    #[serde(default)]
    pub compare: Vec<String>,
}

impl Selection {
    pub fn for_year(year: i32) -> Self {
        Self {
            year,
            ..Default::default()
        }
    }

    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country;
        self
    }

    pub fn with_range(mut self, from: Option<i32>, to: Option<i32>) -> Self {
        self.year_from = from;
        self.year_to = to;
        self
    }

    pub fn with_compare(mut self, countries: Vec<String>) -> Self {
        self.compare = countries;
        self
    }

    /// The table restricted to this selection's year range and regions
    pub fn apply(&self, dataset: &Dataset, reference: &CountryReference) -> Dataset {
        dataset
            .in_years(self.year_from, self.year_to)
            .in_regions(&self.regions, reference)
    }

    /// "All Regions" or the selected regions joined with commas
    pub fn regions_label(&self) -> String {
        if self.regions.is_empty() {
            "All Regions".to_string()
        } else {
            self.regions.join(", ")
        }
    }

    /// "2015 - 2022", with open ends filled from the data
    pub fn range_label(&self, dataset: &Dataset) -> String {
        let years = dataset.years();
        let from = self.year_from.or_else(|| years.first().copied());
        let to = self.year_to.or_else(|| years.last().copied());
        match (from, to) {
            (Some(from), Some(to)) => format!("{} - {}", from, to),
            _ => "n/a".to_string(),
        }
    }
}

/// Split a comma-separated list, dropping empty items
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
