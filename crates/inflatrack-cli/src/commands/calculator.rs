//! Purchasing-power calculator command

use anyhow::{Context, Result};
use inflatrack_core::adjust;

use super::Session;

pub fn cmd_adjust(
    session: &Session,
    country: &str,
    from: i32,
    to: i32,
    amount: f64,
) -> Result<()> {
    if from > to {
        anyhow::bail!("Invalid year range: {} is after {}", from, to);
    }

    let series = adjust(&session.dataset, country, from, to, amount)
        .with_context(|| format!("Cannot compute purchasing power for {}", country))?;

    println!();
    println!("💰 Purchasing Power: {}", series.country);
    println!("   {:.2} in {} through {}", series.initial_amount, from, to);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:>6} │ {:>11} │ {:>14}", "Year", "Price Index", "Adjusted Value");
    println!("   ───────┼─────────────┼───────────────");
    for point in &series.points {
        println!(
            "   {:>6} │ {:>11.2} │ {:>14.2}",
            point.year, point.price_index, point.adjusted_value
        );
    }

    println!();
    println!(
        "   {:.2} in {} has the buying power of {:.2} in {}",
        series.initial_amount,
        from,
        series.final_value(),
        series.points.last().map(|p| p.year).unwrap_or(from)
    );
    if let Some(cumulative) = series.cumulative_inflation() {
        println!("   Cumulative inflation: {:.2}%", cumulative);
    }

    Ok(())
}
