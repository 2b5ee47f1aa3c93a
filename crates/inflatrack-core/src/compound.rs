//! Compound inflation: price index and purchasing-power trajectories

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{AdjustedPoint, AdjustedSeries, Dataset};

const BASE_INDEX: f64 = 100.0;

/// Compound a country's yearly rates from a base index of 100 at `start_year`
///
/// The first point is always the seed (`start_year`, 100, `initial_amount`);
/// each later year in range multiplies the running index by `1 + rate/100`.
/// Gaps in the data are skipped, not interpolated. Returns `NotFound` when
/// the country has no rows in `[start_year, end_year]`.
pub fn adjust(
    dataset: &Dataset,
    country: &str,
    start_year: i32,
    end_year: i32,
    initial_amount: f64,
) -> Result<AdjustedSeries> {
    let rows: Vec<_> = dataset
        .for_country(country)
        .into_iter()
        .filter(|r| r.year >= start_year && r.year <= end_year)
        .collect();

    if rows.is_empty() {
        return Err(Error::NotFound(format!(
            "no inflation data for {} between {} and {}",
            country, start_year, end_year
        )));
    }

    let mut points = vec![AdjustedPoint {
        year: start_year,
        price_index: BASE_INDEX,
        adjusted_value: initial_amount,
    }];
    let mut index = BASE_INDEX;

    for row in rows.iter().filter(|r| r.year != start_year) {
        index *= 1.0 + row.inflation / 100.0;
        points.push(AdjustedPoint {
            year: row.year,
            price_index: index,
            adjusted_value: initial_amount * index / BASE_INDEX,
        });
    }

    debug!(
        country,
        start_year,
        end_year,
        points = points.len(),
        final_index = index,
        "Compounded inflation"
    );

    Ok(AdjustedSeries {
        country: country.to_string(),
        start_year,
        end_year,
        initial_amount,
        points,
    })
}

/// Single equivalent percent rate of successive yearly percent rates
pub fn compound_rates(rates: &[f64]) -> f64 {
    let factor: f64 = rates.iter().map(|r| 1.0 + r / 100.0).product();
    (factor - 1.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InflationRecord;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn series_a() -> Dataset {
        Dataset::new(vec![
            InflationRecord::new("A", "AAA", 2022, 8.0),
            InflationRecord::new("A", "AAA", 2020, 5.0),
            InflationRecord::new("A", "AAA", 2021, -2.0),
            InflationRecord::new("B", "BBB", 2021, 50.0),
        ])
    }

    #[test]
    fn test_end_to_end_example() {
        let series = adjust(&series_a(), "A", 2020, 2022, 100.0).unwrap();
        let index: Vec<f64> = series.points.iter().map(|p| p.price_index).collect();
        assert_eq!(index.len(), 3);
        assert!(close(index[0], 100.0));
        assert!(close(index[1], 98.0));
        assert!(close(index[2], 105.84));
        assert!(close(series.final_value(), 105.84));
        assert_eq!(
            series.points.iter().map(|p| p.year).collect::<Vec<_>>(),
            vec![2020, 2021, 2022]
        );
    }

    #[test]
    fn test_start_equals_end_is_seed_only() {
        let series = adjust(&series_a(), "A", 2021, 2021, 250.0).unwrap();
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].adjusted_value, 250.0);
        assert_eq!(series.final_value(), 250.0);
    }

    #[test]
    fn test_single_ten_percent_year() {
        let ds = Dataset::new(vec![
            InflationRecord::new("C", "CCC", 2020, 3.0),
            InflationRecord::new("C", "CCC", 2021, 10.0),
        ]);
        let series = adjust(&ds, "C", 2020, 2021, 500.0).unwrap();
        assert!(close(series.final_value(), 550.0));
        assert!(close(series.cumulative_inflation().unwrap(), 10.0));
    }

    #[test]
    fn test_seed_year_without_data() {
        // No 2019 observation: the seed is still placed at start_year
        let series = adjust(&series_a(), "A", 2019, 2020, 100.0).unwrap();
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].year, 2019);
        assert!(close(series.points[1].price_index, 105.0));
    }

    #[test]
    fn test_not_found() {
        assert!(matches!(
            adjust(&series_a(), "Z", 2020, 2022, 100.0),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            adjust(&series_a(), "A", 2000, 2005, 100.0),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            adjust(&series_a(), "A", 2022, 2020, 100.0),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_compounding_equals_equivalent_rate() {
        let (r1, r2) = (7.5, -3.25);
        let ds = Dataset::new(vec![
            InflationRecord::new("D", "DDD", 2000, 0.0),
            InflationRecord::new("D", "DDD", 2001, r1),
            InflationRecord::new("D", "DDD", 2002, r2),
        ]);
        let two_step = adjust(&ds, "D", 2000, 2002, 100.0).unwrap().final_value();

        let equivalent = compound_rates(&[r1, r2]);
        let one_step = Dataset::new(vec![
            InflationRecord::new("E", "EEE", 2000, 0.0),
            InflationRecord::new("E", "EEE", 2001, equivalent),
        ]);
        let single = adjust(&one_step, "E", 2000, 2001, 100.0).unwrap().final_value();

        assert!(close(two_step, single));
        assert!(close(
            equivalent,
            ((1.0 + r1 / 100.0) * (1.0 + r2 / 100.0) - 1.0) * 100.0
        ));
    }

    #[test]
    fn test_compound_rates_empty() {
        assert_eq!(compound_rates(&[]), 0.0);
    }
}
