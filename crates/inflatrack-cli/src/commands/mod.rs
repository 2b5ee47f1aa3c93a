//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `data` - Session loading (snapshot or live fetch), fetch and export commands
//! - `map` - Map rows and insight statements for one year
//! - `calculator` - Purchasing-power calculator
//! - `patterns` - Trajectory clustering and similarity search
//! - `compare` - Country comparison and statistics
//! - `serve` - Web server command

pub mod calculator;
pub mod compare;
pub mod data;
pub mod map;
pub mod patterns;
pub mod serve;

// Re-export command functions for main.rs
pub use calculator::*;
pub use compare::*;
pub use data::*;
pub use map::*;
pub use patterns::*;
pub use serve::*;

use anyhow::Result;
use inflatrack_core::{CountryReference, Dataset};

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Fail on region names the reference table does not know
pub fn check_regions(regions: &[String], reference: &CountryReference) -> Result<()> {
    let known = reference.regions();
    if let Some(unknown) = regions.iter().find(|r| !known.contains(r)) {
        anyhow::bail!(
            "Unknown region: {}. Available: {}",
            unknown,
            known.join(", ")
        );
    }
    Ok(())
}

/// The requested year, or the latest year with data
pub fn resolve_year(dataset: &Dataset, year: Option<i32>) -> Result<i32> {
    match year {
        Some(year) => Ok(year),
        None => dataset
            .years()
            .last()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("The dataset contains no records")),
    }
}
