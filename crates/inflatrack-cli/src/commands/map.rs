//! Map and insight command implementations

use anyhow::Result;
use inflatrack_core::{
    generate_insights, project, summarize, ColorBand, InsightContext, Selection,
};

use super::{check_regions, resolve_year, truncate, Session};

pub fn cmd_map(session: &Session, year: Option<i32>, regions: &[String]) -> Result<()> {
    check_regions(regions, &session.reference)?;
    let year = resolve_year(&session.dataset, year)?;

    let filtered = session.dataset.in_regions(regions, &session.reference);
    let rows = project(&filtered, year, &session.reference);

    println!();
    println!("🗺️  Inflation Map: {}", year);
    if !regions.is_empty() {
        println!("   Regions: {}", regions.join(", "));
    }
    println!("   ─────────────────────────────────────────────────────────────");

    let Some(summary) = summarize(&rows) else {
        println!("   No data for {}.", year);
        return Ok(());
    };

    println!(
        "   {:28} │ {:>9} │ {:>10} │ {:>10}",
        "Country", "Inflation", "Band", "Elevation"
    );
    println!("   ─────────────────────────────┼───────────┼────────────┼───────────");
    for row in &rows {
        println!(
            "   {:28} │ {:>8.2}% │ {:>10} │ {:>10.0}",
            truncate(&row.country, 28),
            row.inflation,
            ColorBand::for_inflation(row.inflation).as_str(),
            row.elevation
        );
    }

    println!();
    println!("   Countries: {}", summary.countries);
    println!("   Average:   {:.2}%", summary.average);
    println!(
        "   Highest:   {} ({:.2}%)",
        summary.highest.country, summary.highest.value
    );
    println!(
        "   Lowest:    {} ({:.2}%)",
        summary.lowest.country, summary.lowest.value
    );

    Ok(())
}

pub fn cmd_insights(
    session: &Session,
    year: Option<i32>,
    regions: &[String],
    country: Option<&str>,
) -> Result<()> {
    check_regions(regions, &session.reference)?;
    let year = resolve_year(&session.dataset, year)?;

    let selection = Selection::for_year(year)
        .with_regions(regions.to_vec())
        .with_country(country.map(str::to_string));
    let filtered = session
        .dataset
        .in_regions(&selection.regions, &session.reference);
    let rows = project(&filtered, year, &session.reference);

    let ctx = InsightContext::from_selection(&selection, &rows, &filtered, &session.reference)
        .with_high_threshold(session.config.analysis.high_inflation_threshold);
    let insights = generate_insights(&ctx);

    println!();
    println!("💡 Insights: {} ({})", year, selection.regions_label());
    println!("   ─────────────────────────────────────────────────────────────");

    if insights.is_empty() {
        println!("   Nothing notable for this selection.");
        return Ok(());
    }

    for insight in &insights {
        println!("   {} {}", insight.severity.icon(), insight.title);
        println!("      {}", insight.message);
    }

    Ok(())
}
