//! K-means clustering of standardized inflation trajectories

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::matrix::TrajectoryMatrix;
use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::models::{mean, ClusterAssignment, ClusterProfile, Dataset};
use crate::reference::CountryReference;

/// Centroid movement below which Lloyd iterations stop
const TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KMeansOptions {
    pub k: usize,
    pub seed: u64,
    /// Independent k-means++ restarts; the lowest inertia wins
    pub n_init: usize,
    pub max_iter: usize,
}

impl Default for KMeansOptions {
    fn default() -> Self {
        Self {
            k: 4,
            seed: 42,
            n_init: 10,
            max_iter: 300,
        }
    }
}

impl From<&AnalysisConfig> for KMeansOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            k: config.clusters,
            seed: config.seed,
            n_init: config.n_init.max(1),
            max_iter: config.max_iter.max(1),
        }
    }
}

impl KMeansOptions {
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }
}

/// Group countries by the shape of their inflation history
pub fn cluster(
    dataset: &Dataset,
    reference: &CountryReference,
    options: &KMeansOptions,
) -> Result<ClusterAssignment> {
    let matrix = TrajectoryMatrix::build(dataset, reference);
    cluster_matrix(&matrix, options)
}

/// Cluster an already-built matrix
///
/// Returns `Unavailable` when `k` is zero or the matrix has fewer than `k`
/// countries. Cluster ids are numbered in order of first appearance over the
/// alphabetical country list, so the same input and seed always produce the
/// same mapping.
pub fn cluster_matrix(matrix: &TrajectoryMatrix, options: &KMeansOptions) -> Result<ClusterAssignment> {
    let k = options.k;
    if k == 0 {
        return Err(Error::Unavailable("cluster count must be at least 1".into()));
    }
    if matrix.n_rows() < k {
        return Err(Error::Unavailable(format!(
            "need at least {} countries to form {} clusters, found {}",
            k,
            k,
            matrix.n_rows()
        )));
    }

    let points = matrix.standardized();
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut best: Option<(Vec<usize>, f64)> = None;

    for run in 0..options.n_init.max(1) {
        let seeds = init_centroids(&points, k, &mut rng);
        let (labels, inertia) = lloyd(&points, seeds, options.max_iter.max(1));
        debug!(run, inertia, "k-means run finished");
        if best.as_ref().map_or(true, |(_, b)| inertia < *b) {
            best = Some((labels, inertia));
        }
    }

    let (labels, inertia) = best.ok_or_else(|| Error::Unavailable("no k-means run completed".into()))?;

    let mut relabel: BTreeMap<usize, usize> = BTreeMap::new();
    let mut assignments = BTreeMap::new();
    for (country, label) in matrix.countries.iter().zip(labels) {
        let next = relabel.len();
        let id = *relabel.entry(label).or_insert(next);
        assignments.insert(country.clone(), id);
    }

    debug!(k, inertia, countries = assignments.len(), "Clustered countries");

    Ok(ClusterAssignment {
        k,
        inertia,
        assignments,
    })
}

/// Members and mean raw inflation for every non-empty cluster
pub fn profiles(assignment: &ClusterAssignment, matrix: &TrajectoryMatrix) -> Vec<ClusterProfile> {
    (0..assignment.k)
        .filter_map(|id| {
            let members: Vec<String> = assignment
                .members(id)
                .into_iter()
                .map(str::to_string)
                .collect();
            if members.is_empty() {
                return None;
            }
            let values: Vec<f64> = members
                .iter()
                .filter_map(|m| matrix.row(m))
                .flatten()
                .copied()
                .collect();
            Some(ClusterProfile {
                id,
                members,
                mean_inflation: mean(&values).unwrap_or(0.0),
            })
        })
        .collect()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Index and squared distance of the closest centroid; ties go to the lower index
fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, c) in centroids.iter().enumerate() {
        let d = squared_distance(point, c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

/// k-means++ seeding
fn init_centroids(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())].clone());

    while centroids.len() < k {
        let weights: Vec<f64> = points.iter().map(|p| nearest(p, &centroids).1).collect();
        let total: f64 = weights.iter().sum();

        let pick = if total > 0.0 {
            let mut target = rng.gen::<f64>() * total;
            let mut chosen = points.len() - 1;
            for (i, w) in weights.iter().enumerate() {
                if target < *w {
                    chosen = i;
                    break;
                }
                target -= w;
            }
            chosen
        } else {
            // Every point already sits on a centroid
            rng.gen_range(0..points.len())
        };
        centroids.push(points[pick].clone());
    }
    centroids
}

/// Lloyd iterations; returns final labels and inertia
fn lloyd(points: &[Vec<f64>], mut centroids: Vec<Vec<f64>>, max_iter: usize) -> (Vec<usize>, f64) {
    let dims = points.first().map_or(0, Vec::len);
    let k = centroids.len();

    for _ in 0..max_iter {
        let nearest_all: Vec<(usize, f64)> = points.iter().map(|p| nearest(p, &centroids)).collect();

        let mut sums = vec![vec![0.0; dims]; k];
        let mut counts = vec![0usize; k];
        for (point, &(label, _)) in points.iter().zip(&nearest_all) {
            counts[label] += 1;
            for (s, v) in sums[label].iter_mut().zip(point) {
                *s += v;
            }
        }

        // Farthest points first, for re-seeding empty clusters
        let mut spare: Vec<usize> = (0..points.len()).collect();
        spare.sort_by(|&a, &b| nearest_all[b].1.total_cmp(&nearest_all[a].1).then(a.cmp(&b)));
        let mut spare = spare.into_iter();

        let mut shift = 0.0;
        for c in 0..k {
            let updated = if counts[c] > 0 {
                sums[c].iter().map(|s| s / counts[c] as f64).collect()
            } else {
                match spare.next() {
                    Some(i) => points[i].clone(),
                    None => centroids[c].clone(),
                }
            };
            shift += squared_distance(&centroids[c], &updated);
            centroids[c] = updated;
        }

        if shift <= TOLERANCE {
            break;
        }
    }

    let mut inertia = 0.0;
    let labels = points
        .iter()
        .map(|p| {
            let (label, d) = nearest(p, &centroids);
            inertia += d;
            label
        })
        .collect();
    (labels, inertia)
}
