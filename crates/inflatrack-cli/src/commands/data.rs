//! Data loading, fetch and export commands
//!
//! This module contains:
//! - `load_session` - Shared utility to resolve config, reference and dataset
//! - `cmd_fetch` - Save a World Bank snapshot
//! - `cmd_export` - Filtered CSV export with an optional summary

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use inflatrack_core::{
    analysis_summary, export_csv, project, save_snapshot, AppConfig, CountryReference, Dataset,
    ExportOptions, InflationSource, Selection, StaticSource, WorldBankClient,
};
use tracing::debug;

use super::{check_regions, resolve_year};

/// Everything an analytic command needs
pub struct Session {
    pub config: AppConfig,
    pub reference: CountryReference,
    pub dataset: Dataset,
}

impl Session {
    pub fn new(config: AppConfig, reference: CountryReference, dataset: Dataset) -> Self {
        Self {
            config,
            reference,
            dataset,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    AppConfig::load(path).context("Failed to load configuration")
}

/// Snapshot file when `--data` is given, otherwise the World Bank API
pub fn open_source(config: &AppConfig, data: Option<&Path>) -> Result<Arc<dyn InflationSource>> {
    match data {
        Some(path) => {
            let source = StaticSource::from_path(path)
                .with_context(|| format!("Failed to open snapshot {}", path.display()))?;
            Ok(Arc::new(source))
        }
        None => {
            let client = WorldBankClient::new(&config.source)
                .context("Failed to create World Bank client")?;
            Ok(Arc::new(client))
        }
    }
}

pub async fn load_session(data: Option<&Path>, config_path: Option<&Path>) -> Result<Session> {
    let config = load_config(config_path)?;
    let reference = config
        .country_reference()
        .context("Failed to load country reference")?;
    let source = open_source(&config, data)?;
    let dataset = source
        .fetch()
        .await
        .with_context(|| format!("Failed to load data from {}", source.name()))?;
    debug!(
        source = source.name(),
        records = dataset.len(),
        "Session loaded"
    );
    Ok(Session::new(config, reference, dataset))
}

pub async fn cmd_fetch(
    config_path: Option<&Path>,
    output: &Path,
    from: Option<i32>,
    to: Option<i32>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let start = from.unwrap_or(config.source.start_year);
    let end = to.unwrap_or(config.source.end_year);
    if start > end {
        anyhow::bail!("Invalid year range: {} is after {}", start, end);
    }

    println!("🌍 Fetching {} for {}-{}...", config.source.indicator, start, end);

    let client = WorldBankClient::new(&config.source)
        .context("Failed to create World Bank client")?
        .with_years(start, end);
    let dataset = client.fetch().await.context("Failed to fetch inflation data")?;

    save_snapshot(&dataset, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "✅ Saved {} records ({} countries) to {}",
        dataset.len(),
        dataset.countries().len(),
        output.display()
    );

    Ok(())
}

/// Sibling file for the text summary, e.g. `out.csv` -> `out_summary.txt`
fn summary_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("inflation_data");
    output.with_file_name(format!("{}_summary.txt", stem))
}

pub fn cmd_export(
    session: &Session,
    output: &Path,
    from: Option<i32>,
    to: Option<i32>,
    regions: &[String],
    summary: bool,
) -> Result<()> {
    check_regions(regions, &session.reference)?;
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            anyhow::bail!("Invalid year range: {} is after {}", from, to);
        }
    }

    let options = ExportOptions {
        from,
        to,
        regions: regions.to_vec(),
    };
    let csv = export_csv(&session.dataset, &options, &session.reference)?;
    std::fs::write(output, &csv)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let rows = csv.lines().count().saturating_sub(1);
    println!("📁 Exported {} records to {}", rows, output.display());

    if summary {
        let selection = Selection::for_year(resolve_year(&session.dataset.in_years(from, to), to)?)
            .with_regions(regions.to_vec())
            .with_range(from, to);
        let filtered = selection.apply(&session.dataset, &session.reference);
        let shown = project(&filtered, selection.year, &session.reference).len();
        let text = analysis_summary(&selection, &session.dataset, shown, Utc::now());

        let path = summary_path(output);
        std::fs::write(&path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("   Summary: {}", path.display());
    }

    Ok(())
}
