//! Clustering and similarity command implementations

use anyhow::{Context, Result};
use inflatrack_core::patterns::{cluster_matrix, profiles, similar_in_matrix};
use inflatrack_core::{KMeansOptions, TrajectoryMatrix};

use super::{check_regions, truncate, Session};

pub fn cmd_cluster(session: &Session, k: Option<usize>, regions: &[String]) -> Result<()> {
    check_regions(regions, &session.reference)?;

    let mut options = KMeansOptions::from(&session.config.analysis);
    if let Some(k) = k {
        options = options.with_k(k);
    }

    let filtered = session.dataset.in_regions(regions, &session.reference);
    let matrix = TrajectoryMatrix::build(&filtered, &session.reference);
    let assignment = cluster_matrix(&matrix, &options).context("Clustering failed")?;

    println!();
    println!("🧩 Inflation Pattern Clusters (k = {})", assignment.k);
    println!(
        "   {} countries over {} years, inertia {:.3}",
        matrix.n_rows(),
        matrix.n_cols(),
        assignment.inertia
    );
    println!("   ─────────────────────────────────────────────────────────────");

    for profile in profiles(&assignment, &matrix) {
        println!(
            "   Cluster {} ({} countries, mean {:.2}%)",
            profile.id + 1,
            profile.members.len(),
            profile.mean_inflation
        );
        println!("      {}", profile.members.join(", "));
    }

    Ok(())
}

pub fn cmd_similar(
    session: &Session,
    country: &str,
    top: Option<usize>,
    regions: &[String],
) -> Result<()> {
    check_regions(regions, &session.reference)?;
    let top = top.unwrap_or(session.config.analysis.top_n);

    let filtered = session.dataset.in_regions(regions, &session.reference);
    let matrix = TrajectoryMatrix::build(&filtered, &session.reference);
    let ranked = similar_in_matrix(&matrix, country, top)
        .with_context(|| format!("Cannot rank countries similar to {}", country))?;

    println!();
    println!("🔗 Countries most similar to {}", country);
    println!("   ─────────────────────────────────────────────────────────────");

    if ranked.is_empty() {
        println!("   No other countries to compare against.");
        return Ok(());
    }

    println!("   {:28} │ {:>10} │ {:>8}", "Country", "Similarity", "Match");
    println!("   ─────────────────────────────┼────────────┼─────────");
    for entry in &ranked {
        println!(
            "   {:28} │ {:>10.3} │ {:>8}",
            truncate(&entry.country, 28),
            entry.score,
            entry.strength().as_str()
        );
    }

    Ok(())
}
