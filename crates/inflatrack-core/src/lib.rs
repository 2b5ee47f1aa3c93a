//! Inflatrack Core Library
//!
//! Shared functionality for the inflatrack inflation analytics toolkit:
//! - Typed inflation records and country reference data
//! - Geo-projection of a year onto map rows (color bands, elevation)
//! - Compound inflation and purchasing-power trajectories
//! - Trajectory clustering and similarity search
//! - Insight engine for automatic fact statements
//! - World Bank fetch client, snapshots and a time-boxed cache entry

pub mod cache;
pub mod compound;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod geo;
pub mod insights;
pub mod models;
pub mod patterns;
pub mod reference;
pub mod selection;
pub mod stats;

/// Test utilities including a mock World Bank server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cache::TimedCache;
pub use compound::{adjust, compound_rates};
pub use config::{AnalysisConfig, AppConfig, CacheConfig, ReferenceConfig, SourceConfig};
pub use error::{Error, Result};
pub use export::{analysis_summary, export_csv, load_snapshot, save_snapshot, ExportFormat, ExportOptions};
pub use fetch::{InflationSource, StaticSource, WorldBankClient};
pub use geo::{apply_highlights, project, summarize, HighlightOptions, ELEVATION_SCALE};
pub use insights::{generate_insights, Insight, InsightContext, InsightEngine, InsightKind, Severity};
pub use models::{
    AdjustedPoint, AdjustedSeries, ClusterAssignment, ClusterProfile, ColorBand, ComparisonSeries,
    CountryStats, CountryValue, Dataset, InflationRecord, MapRow, MapSummary, MatchStrength, Rgba,
    Similarity,
};
pub use patterns::{cluster, cosine_similarity, similar, KMeansOptions, TrajectoryMatrix};
pub use reference::{Coordinates, CountryInfo, CountryReference};
pub use selection::Selection;
pub use stats::{compare, country_stats, normalize_to_base, rolling_mean, volatility, CompareOptions};
