//! Geo-projection: a yearly slice of the table as map-ready rows

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ClusterAssignment, ColorBand, CountryValue, Dataset, MapRow, MapSummary, Rgba};
use crate::reference::CountryReference;

/// Column height per percentage point of inflation
pub const ELEVATION_SCALE: f64 = 10_000.0;

const CLUSTER_PALETTE: [Rgba; 4] = [
    Rgba([255, 100, 100, 220]),
    Rgba([100, 255, 100, 220]),
    Rgba([100, 100, 255, 220]),
    Rgba([255, 255, 100, 220]),
];
const CLUSTER_FALLBACK: Rgba = Rgba([128, 128, 128, 220]);
const HIGH_HIGHLIGHT: Rgba = Rgba([255, 0, 150, 255]);
const DEFLATION_HIGHLIGHT: Rgba = Rgba([0, 255, 255, 255]);
const SELECTED_HIGHLIGHT: Rgba = Rgba([255, 255, 0, 255]);

pub fn elevation(inflation: f64) -> f64 {
    inflation.abs() * ELEVATION_SCALE
}

/// Map rows for every reference country with a value in `year`
///
/// Rows come back sorted by country. Duplicate (country, year) records are
/// averaged into a single row.
pub fn project(dataset: &Dataset, year: i32, reference: &CountryReference) -> Vec<MapRow> {
    let mut cells: BTreeMap<&str, (f64, usize, &str)> = BTreeMap::new();
    let mut dropped = 0usize;

    for record in dataset.records().iter().filter(|r| r.year == year) {
        if !reference.contains(&record.country) {
            dropped += 1;
            continue;
        }
        let cell = cells
            .entry(record.country.as_str())
            .or_insert((0.0, 0, record.country_code.as_str()));
        cell.0 += record.inflation;
        cell.1 += 1;
    }

    let rows: Vec<MapRow> = cells
        .into_iter()
        .filter_map(|(country, (sum, n, code))| {
            let coords = reference.coordinates(country)?;
            let inflation = sum / n as f64;
            Some(MapRow {
                country: country.to_string(),
                country_code: code.to_string(),
                inflation,
                lat: coords.lat,
                lon: coords.lon,
                color: ColorBand::for_inflation(inflation).color(),
                elevation: elevation(inflation),
            })
        })
        .collect();

    debug!(year, rows = rows.len(), dropped, "Projected map rows");
    rows
}

/// Average, highest and lowest inflation across the rows
pub fn summarize(rows: &[MapRow]) -> Option<MapSummary> {
    let highest = rows.iter().max_by(|a, b| a.inflation.total_cmp(&b.inflation))?;
    let lowest = rows.iter().min_by(|a, b| a.inflation.total_cmp(&b.inflation))?;
    let average = rows.iter().map(|r| r.inflation).sum::<f64>() / rows.len() as f64;

    Some(MapSummary {
        countries: rows.len(),
        average,
        highest: CountryValue {
            country: highest.country.clone(),
            value: highest.inflation,
        },
        lowest: CountryValue {
            country: lowest.country.clone(),
            value: lowest.inflation,
        },
    })
}

/// Presentation overlays on top of the band colors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighlightOptions {
    /// Recolor rows above this inflation value
    pub high_threshold: Option<f64>,
    pub deflation: bool,
    pub selected_country: Option<String>,
}

/// Recolor rows in place
///
/// Later overlays win: cluster palette, then high inflation, then deflation,
/// then the selected country.
pub fn apply_highlights(
    rows: &mut [MapRow],
    options: &HighlightOptions,
    clusters: Option<&ClusterAssignment>,
) {
    for row in rows.iter_mut() {
        if let Some(id) = clusters.and_then(|c| c.cluster_of(&row.country)) {
            row.color = CLUSTER_PALETTE.get(id).copied().unwrap_or(CLUSTER_FALLBACK);
        }
        if options.high_threshold.is_some_and(|t| row.inflation > t) {
            row.color = HIGH_HIGHLIGHT;
        }
        if options.deflation && row.inflation < 0.0 {
            row.color = DEFLATION_HIGHLIGHT;
        }
        if options.selected_country.as_deref() == Some(row.country.as_str()) {
            row.color = SELECTED_HIGHLIGHT;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InflationRecord;
    use crate::test_utils::{sample_dataset, sample_reference};
    use std::collections::HashSet;

    #[test]
    fn test_project_filters_year_and_reference() {
        let ds = sample_dataset();
        let reference = sample_reference();
        let rows = project(&ds, 2022, &reference);

        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| reference.contains(&r.country)));
        assert!(rows.iter().all(|r| r.country != "Atlantis"));

        let germany = rows.iter().find(|r| r.country == "Germany").unwrap();
        assert_eq!(germany.inflation, 6.9);
        assert_eq!(germany.country_code, "DEU");
        assert_eq!(germany.color, ColorBand::High.color());
        assert!((germany.elevation - 69_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_project_unique_countries_with_duplicates() {
        let reference = sample_reference();
        let ds = Dataset::new(vec![
            InflationRecord::new("Germany", "DEU", 2020, 1.0),
            InflationRecord::new("Germany", "DEU", 2020, 3.0),
            InflationRecord::new("France", "FRA", 2020, 0.5),
        ]);
        let rows = project(&ds, 2020, &reference);
        let unique: HashSet<&str> = rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(unique.len(), rows.len());

        let germany = rows.iter().find(|r| r.country == "Germany").unwrap();
        assert_eq!(germany.inflation, 2.0);
        assert_eq!(germany.color, ColorBand::Moderate.color());
    }

    #[test]
    fn test_project_missing_year() {
        let rows = project(&sample_dataset(), 1990, &sample_reference());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_elevation_non_negative_and_monotonic() {
        assert_eq!(elevation(0.0), 0.0);
        assert_eq!(elevation(-3.0), elevation(3.0));
        assert!(elevation(5.0) > elevation(-4.0));
    }

    #[test]
    fn test_summarize() {
        let rows = project(&sample_dataset(), 2022, &sample_reference());
        let summary = summarize(&rows).unwrap();
        assert_eq!(summary.countries, rows.len());
        assert_eq!(summary.highest.country, "Argentina");
        assert_eq!(summary.lowest.country, "China");
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_highlight_precedence() {
        let reference = sample_reference();
        let mut rows = project(&sample_dataset(), 2020, &reference);

        let mut assignments = BTreeMap::new();
        for (i, row) in rows.iter().enumerate() {
            assignments.insert(row.country.clone(), i % 5);
        }
        let clusters = ClusterAssignment {
            k: 5,
            inertia: 0.0,
            assignments,
        };
        let options = HighlightOptions {
            high_threshold: Some(10.0),
            deflation: true,
            selected_country: Some("Germany".to_string()),
        };
        apply_highlights(&mut rows, &options, Some(&clusters));

        for row in &rows {
            let expected = if row.country == "Germany" {
                SELECTED_HIGHLIGHT
            } else if row.inflation < 0.0 {
                DEFLATION_HIGHLIGHT
            } else if row.inflation > 10.0 {
                HIGH_HIGHLIGHT
            } else {
                let id = clusters.cluster_of(&row.country).unwrap();
                CLUSTER_PALETTE.get(id).copied().unwrap_or(CLUSTER_FALLBACK)
            };
            assert_eq!(row.color, expected, "{}", row.country);
        }
    }

    #[test]
    fn test_no_highlights_keeps_band_colors() {
        let reference = sample_reference();
        let mut rows = project(&sample_dataset(), 2021, &reference);
        let before = rows.clone();
        apply_highlights(&mut rows, &HighlightOptions::default(), None);
        assert_eq!(rows, before);
    }
}
