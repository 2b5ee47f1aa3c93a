//! Comparison and statistics command implementations

use anyhow::{Context, Result};
use inflatrack_core::stats::MAX_COMPARE;
use inflatrack_core::{compare, country_stats, CompareOptions};

use super::{truncate, Session};

fn format_value(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

pub fn cmd_compare(
    session: &Session,
    countries: &[String],
    from: Option<i32>,
    to: Option<i32>,
    normalize: bool,
    rolling: bool,
) -> Result<()> {
    if countries.len() > MAX_COMPARE {
        anyhow::bail!("At most {} countries can be compared", MAX_COMPARE);
    }
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            anyhow::bail!("Invalid year range: {} is after {}", from, to);
        }
    }

    let options = CompareOptions {
        from,
        to,
        normalize,
        rolling,
        year: None,
    };
    let series = compare(&session.dataset, countries, &options);

    println!();
    println!(
        "📈 Inflation Comparison{}",
        if normalize { " (base = 100)" } else { "" }
    );
    println!("   ─────────────────────────────────────────────────────────────");

    if series.is_empty() {
        println!("   No data for the requested countries.");
        return Ok(());
    }

    let missing: Vec<&str> = countries
        .iter()
        .filter(|c| !series.iter().any(|s| &s.country == *c))
        .map(String::as_str)
        .collect();

    for line in &series {
        println!("   {}", line.country);
        for (i, (year, value)) in line.years.iter().zip(&line.values).enumerate() {
            let smoothed = line.rolling.as_ref().and_then(|r| r.get(i).copied().flatten());
            if rolling {
                println!(
                    "      {} │ {:>8.2} │ avg {:>8}",
                    year,
                    value,
                    format_value(smoothed)
                );
            } else {
                println!("      {} │ {:>8.2}", year, value);
            }
        }
    }

    println!();
    println!(
        "   {:24} │ {:>8} │ {:>8} │ {:>8} │ {:>10}",
        "Country", "Mean", "Max", "Min", "Volatility"
    );
    println!("   ─────────────────────────┼──────────┼──────────┼──────────┼───────────");
    for line in &series {
        println!(
            "   {:24} │ {:>8.2} │ {:>8.2} │ {:>8.2} │ {:>10}",
            truncate(&line.country, 24),
            line.stats.mean,
            line.stats.max,
            line.stats.min,
            format_value(line.stats.volatility)
        );
    }

    if !missing.is_empty() {
        println!();
        println!("   ⚠️  No data for: {}", missing.join(", "));
    }

    Ok(())
}

pub fn cmd_stats(session: &Session, country: &str, year: Option<i32>) -> Result<()> {
    let year = match year {
        Some(year) => Some(year),
        None => session.dataset.years().last().copied(),
    };
    let stats = country_stats(&session.dataset, country, year)
        .with_context(|| format!("Cannot compute statistics for {}", country))?;

    println!();
    println!("📊 {} Inflation Statistics", stats.country);
    println!("   ─────────────────────────────────────────────────────────────");
    if let Some(year) = year {
        println!("   Current ({}):  {}%", year, format_value(stats.current));
    }
    println!("   Average:        {:.2}%", stats.mean);
    println!("   Maximum:        {:.2}% ({})", stats.max, stats.max_year);
    println!("   Minimum:        {:.2}% ({})", stats.min, stats.min_year);
    println!("   Volatility:     {}", format_value(stats.volatility));
    println!("   Observations:   {}", stats.observations);

    Ok(())
}
