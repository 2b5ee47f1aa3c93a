//! Export and snapshot files
//!
//! Supports:
//! - Filtered CSV export sorted by country and year
//! - CSV and JSON dataset snapshots (read and write)
//! - Plain-text analysis summary of the active selection

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Dataset, InflationRecord};
use crate::reference::CountryReference;
use crate::selection::Selection;

/// Snapshot file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Guess from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Ok(ExportFormat::Csv),
            Some("json") => Ok(ExportFormat::Json),
            _ => Err(Error::InvalidData(format!(
                "unsupported snapshot format: {} (expected .csv or .json)",
                path.display()
            ))),
        }
    }
}

/// Filters for the data export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// First year (inclusive)
    pub from: Option<i32>,
    /// Last year (inclusive)
    pub to: Option<i32>,
    /// Only these regions; empty for all
    #[serde(default)]
    pub regions: Vec<String>,
}

impl From<&Selection> for ExportOptions {
    fn from(selection: &Selection) -> Self {
        Self {
            from: selection.year_from,
            to: selection.year_to,
            regions: selection.regions.clone(),
        }
    }
}

/// Filtered records, sorted by (country, year)
pub fn export_records(
    dataset: &Dataset,
    options: &ExportOptions,
    reference: &CountryReference,
) -> Vec<InflationRecord> {
    let mut records = dataset
        .in_years(options.from, options.to)
        .in_regions(&options.regions, reference)
        .into_records();
    records.sort_by(|a, b| a.country.cmp(&b.country).then(a.year.cmp(&b.year)));
    records
}

fn to_csv(records: &[InflationRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::InvalidData(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidData(e.to_string()))
}

/// CSV text with header `country,country_code,year,inflation`
pub fn export_csv(
    dataset: &Dataset,
    options: &ExportOptions,
    reference: &CountryReference,
) -> Result<String> {
    let records = export_records(dataset, options, reference);
    if records.is_empty() {
        return Ok("country,country_code,year,inflation\n".to_string());
    }
    debug!(rows = records.len(), "Exporting CSV");
    to_csv(&records)
}

/// Suggested download name for an export
pub fn export_filename(dataset: &Dataset, options: &ExportOptions) -> String {
    let years = dataset.years();
    let from = options.from.or_else(|| years.first().copied()).unwrap_or_default();
    let to = options.to.or_else(|| years.last().copied()).unwrap_or_default();
    format!("inflation_data_{}_{}.csv", from, to)
}

/// Parse CSV snapshot data
///
/// Rows with a non-finite inflation value are skipped.
pub fn read_csv_from<R: Read>(reader: R) -> Result<Dataset> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in csv_reader.deserialize::<InflationRecord>() {
        let record = row?;
        if !record.inflation.is_finite() {
            skipped += 1;
            continue;
        }
        records.push(record);
    }

    if skipped > 0 {
        warn!(skipped, "Skipped non-numeric inflation rows");
    }
    Ok(Dataset::new(records))
}

pub fn read_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    read_csv_from(file)
}

pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut records = dataset.records().to_vec();
    records.sort_by(|a, b| a.country.cmp(&b.country).then(a.year.cmp(&b.year)));
    let mut writer = csv::Writer::from_path(path)?;
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_json(path: &Path) -> Result<Dataset> {
    let content = std::fs::read_to_string(path)?;
    let dataset: Dataset = serde_json::from_str(&content)?;
    Ok(dataset)
}

pub fn write_json(dataset: &Dataset, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(dataset)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a snapshot, choosing the format by extension
pub fn load_snapshot(path: &Path) -> Result<Dataset> {
    let dataset = match ExportFormat::from_path(path)? {
        ExportFormat::Csv => read_csv(path)?,
        ExportFormat::Json => read_json(path)?,
    };
    debug!(path = %path.display(), records = dataset.len(), "Loaded snapshot");
    Ok(dataset)
}

/// Save a snapshot, choosing the format by extension
pub fn save_snapshot(dataset: &Dataset, path: &Path) -> Result<()> {
    match ExportFormat::from_path(path)? {
        ExportFormat::Csv => write_csv(dataset, path),
        ExportFormat::Json => write_json(dataset, path),
    }
}

/// Plain-text description of the active filters
pub fn analysis_summary(
    selection: &Selection,
    dataset: &Dataset,
    countries_shown: usize,
    generated_at: DateTime<Utc>,
) -> String {
    let country = selection.country.as_deref().unwrap_or("None");
    let compare = if selection.compare.is_empty() {
        "None".to_string()
    } else {
        selection.compare.join(", ")
    };

    format!(
        "Global Inflation Analysis Summary\n\
         Generated: {}\n\
         \n\
         Filters Applied:\n\
         - Year: {}\n\
         - Regions: {}\n\
         - Date Range: {}\n\
         - Countries: {}\n\
         \n\
         Selected Country: {}\n\
         Comparison Countries: {}\n",
        generated_at.format("%Y-%m-%d %H:%M"),
        selection.year,
        selection.regions_label(),
        selection.range_label(dataset),
        countries_shown,
        country,
        compare,
    )
}
