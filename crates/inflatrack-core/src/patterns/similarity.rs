//! Cosine similarity ranking between country trajectories

use std::cmp::Ordering;

use tracing::debug;

use super::matrix::TrajectoryMatrix;
use crate::error::{Error, Result};
use crate::models::{Dataset, Similarity};
use crate::reference::CountryReference;

/// `dot(a, b) / (|a| * |b|)`, or 0 when either vector has zero norm
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    // Adding 0.0 turns a -0.0 into 0.0
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0) + 0.0
}

/// The `top_n` countries whose trajectories point the same way as `target`
pub fn similar(
    dataset: &Dataset,
    reference: &CountryReference,
    target: &str,
    top_n: usize,
) -> Result<Vec<Similarity>> {
    let matrix = TrajectoryMatrix::build(dataset, reference);
    similar_in_matrix(&matrix, target, top_n)
}

/// Rank against an already-built matrix
///
/// Sorted by score descending, ties by country name; `target` itself is
/// never included.
pub fn similar_in_matrix(
    matrix: &TrajectoryMatrix,
    target: &str,
    top_n: usize,
) -> Result<Vec<Similarity>> {
    let target_row = matrix
        .row(target)
        .ok_or_else(|| Error::NotFound(format!("{} has no trajectory data", target)))?;

    let mut ranked: Vec<Similarity> = matrix
        .countries
        .iter()
        .zip(&matrix.values)
        .filter(|(country, _)| country.as_str() != target)
        .map(|(country, row)| Similarity {
            country: country.clone(),
            score: cosine_similarity(target_row, row),
        })
        .collect();

    ranked.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.country.cmp(&b.country),
        other => other,
    });
    ranked.truncate(top_n);

    debug!(target, results = ranked.len(), "Ranked similar countries");
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InflationRecord;
    use crate::test_utils::{sample_dataset, sample_reference};

    #[test]
    fn test_cosine_basics() {
        assert!((cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < 1e-12);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_symmetry_over_matrix() {
        let matrix = TrajectoryMatrix::build(&sample_dataset(), &sample_reference());
        for a in &matrix.values {
            for b in &matrix.values {
                assert_eq!(cosine_similarity(a, b), cosine_similarity(b, a));
            }
        }
    }

    #[test]
    fn test_similar_excludes_self_and_sorted() {
        let ds = sample_dataset();
        let reference = sample_reference();
        let results = similar(&ds, &reference, "Germany", 3).unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|s| s.country != "Germany"));
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(results.iter().all(|s| s.country != "Atlantis"));
    }

    #[test]
    fn test_similar_top_n_larger_than_pool() {
        let ds = sample_dataset();
        let reference = sample_reference();
        let matrix = TrajectoryMatrix::build(&ds, &reference);
        let results = similar_in_matrix(&matrix, "Germany", 100).unwrap();
        assert_eq!(results.len(), matrix.n_rows() - 1);
        assert!(similar_in_matrix(&matrix, "Germany", 0).unwrap().is_empty());
    }

    #[test]
    fn test_similar_ties_broken_by_name() {
        let reference = sample_reference();
        let mut records = Vec::new();
        // Spain and France are both orthogonal to Germany
        for (year, g, s, f) in [(2020, 1.0, 0.0, 0.0), (2021, 0.0, 1.0, 2.0)] {
            records.push(InflationRecord::new("Germany", "DEU", year, g));
            records.push(InflationRecord::new("Spain", "ESP", year, s));
            records.push(InflationRecord::new("France", "FRA", year, f));
        }
        let ds = Dataset::new(records);
        let results = similar(&ds, &reference, "Germany", 5).unwrap();
        let names: Vec<&str> = results.iter().map(|s| s.country.as_str()).collect();
        assert_eq!(names, vec!["France", "Spain"]);
    }

    #[test]
    fn test_orthogonal_ties_ignore_zero_sign() {
        let reference = sample_reference();
        let mut records = Vec::new();
        // France comes out as -0.0 before normalization, Spain as 0.0
        for (year, g, f, s) in [(2020, -1.0, 0.0, 0.0), (2021, 0.0, -1.0, 1.0)] {
            records.push(InflationRecord::new("Germany", "DEU", year, g));
            records.push(InflationRecord::new("France", "FRA", year, f));
            records.push(InflationRecord::new("Spain", "ESP", year, s));
        }
        let ds = Dataset::new(records);
        let results = similar(&ds, &reference, "Germany", 5).unwrap();
        let names: Vec<&str> = results.iter().map(|s| s.country.as_str()).collect();
        assert_eq!(names, vec!["France", "Spain"]);
        assert!(results.iter().all(|s| !s.score.is_sign_negative()));
    }

    #[test]
    fn test_similar_not_found() {
        let ds = sample_dataset();
        let reference = sample_reference();
        assert!(matches!(
            similar(&ds, &reference, "Atlantis", 5),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            similar(&ds, &reference, "Narnia", 5),
            Err(Error::NotFound(_))
        ));
    }
}
