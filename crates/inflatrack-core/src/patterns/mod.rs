//! Pattern analysis over country inflation trajectories
//!
//! Both analyses share one matrix construction step:
//!
//! - [`matrix`] - country × year matrix with gap filling
//! - [`cluster`] - seeded k-means over standardized columns
//! - [`similarity`] - cosine nearest-neighbour ranking
//!
//! ```rust,ignore
//! use inflatrack_core::patterns::{cluster, similar, KMeansOptions};
//!
//! let groups = cluster(&dataset, &reference, &KMeansOptions::default())?;
//! let peers = similar(&dataset, &reference, "Germany", 5)?;
//! ```

pub mod cluster;
pub mod matrix;
pub mod similarity;

pub use cluster::{cluster, cluster_matrix, profiles, KMeansOptions};
pub use matrix::TrajectoryMatrix;
pub use similarity::{cosine_similarity, similar, similar_in_matrix};
