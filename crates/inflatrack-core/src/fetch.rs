//! Inflation data sources
//!
//! [`InflationSource`] is the single fetch interface. [`WorldBankClient`]
//! pulls the indicator from the World Bank API v2, walking every result page;
//! [`StaticSource`] serves a snapshot already in memory or on disk.
//!
//! Field validation happens here: an entry without a numeric value or an
//! integer year never reaches the analytics.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::export::load_snapshot;
use crate::models::{Dataset, InflationRecord};

/// Upper bound on pages walked in one fetch
const MAX_PAGES: u32 = 500;

/// Anything that can produce the full inflation table
#[async_trait]
pub trait InflationSource: Send + Sync {
    /// Short label for logs
    fn name(&self) -> &str;

    /// Fetch every record; an empty result is `Error::Upstream`
    async fn fetch(&self) -> Result<Dataset>;
}

/// One parsed page of a World Bank response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub page: u32,
    pub pages: u32,
    /// Entries in the page, including skipped ones
    pub entries: usize,
    pub records: Vec<InflationRecord>,
    /// Entries dropped for a null value or unparseable field
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct WbEntry {
    country: WbLabel,
    #[serde(default)]
    countryiso3code: String,
    date: String,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WbLabel {
    value: String,
}

/// Read an integer that the API sometimes sends as a string
fn as_u32(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a `[metadata, entries]` response body
pub fn parse_page(body: &Value) -> Result<Page> {
    let parts = body
        .as_array()
        .ok_or_else(|| Error::InvalidData("World Bank response is not an array".into()))?;

    let meta = parts.first();
    if let Some(messages) = meta.and_then(|m| m.get("message")) {
        return Err(Error::Upstream(format!("World Bank API error: {}", messages)));
    }

    let page = as_u32(meta.and_then(|m| m.get("page"))).unwrap_or(1);
    let pages = as_u32(meta.and_then(|m| m.get("pages"))).unwrap_or(1);

    let entries: &[Value] = match parts.get(1) {
        Some(Value::Array(entries)) => entries.as_slice(),
        _ => &[],
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut skipped = 0;
    for raw in entries {
        let entry: WbEntry = match serde_json::from_value(raw.clone()) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "Skipping malformed entry");
                skipped += 1;
                continue;
            }
        };
        let (Some(value), Ok(year)) = (entry.value, entry.date.trim().parse::<i32>()) else {
            skipped += 1;
            continue;
        };
        if !value.is_finite() {
            skipped += 1;
            continue;
        }
        records.push(InflationRecord {
            country: entry.country.value,
            country_code: entry.countryiso3code,
            year,
            inflation: value,
        });
    }

    Ok(Page {
        page,
        pages,
        entries: entries.len(),
        records,
        skipped,
    })
}

/// World Bank API v2 indicator client
#[derive(Clone)]
pub struct WorldBankClient {
    http_client: Client,
    base_url: String,
    indicator: String,
    start_year: i32,
    end_year: i32,
    per_page: u32,
}

impl WorldBankClient {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            indicator: config.indicator.clone(),
            start_year: config.start_year,
            end_year: config.end_year,
            per_page: config.per_page.max(1),
        })
    }

    /// Client against another API root (mirrors, test servers)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_years(mut self, start_year: i32, end_year: i32) -> Self {
        self.start_year = start_year;
        self.end_year = end_year;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/country/all/indicator/{}",
            self.base_url, self.indicator
        )
    }

    /// Fetch and parse a single page (1-based)
    pub async fn fetch_page(&self, page: u32) -> Result<Page> {
        let response = self
            .http_client
            .get(self.endpoint())
            .query(&[
                ("format", "json".to_string()),
                ("date", format!("{}:{}", self.start_year, self.end_year)),
                ("per_page", self.per_page.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        parse_page(&body)
    }

    async fn fetch_all(&self) -> Result<Dataset> {
        let mut records = Vec::new();
        let mut skipped = 0;
        let mut page = 1;

        loop {
            let parsed = self.fetch_page(page).await?;
            if parsed.entries == 0 {
                break;
            }
            debug!(
                page = parsed.page,
                pages = parsed.pages,
                records = parsed.records.len(),
                "Fetched page"
            );
            records.extend(parsed.records);
            skipped += parsed.skipped;

            if page >= parsed.pages || page >= MAX_PAGES {
                break;
            }
            page += 1;
        }

        if skipped > 0 {
            debug!(skipped, "Dropped entries without a value");
        }
        Ok(Dataset::new(records))
    }
}

#[async_trait]
impl InflationSource for WorldBankClient {
    fn name(&self) -> &str {
        "worldbank"
    }

    async fn fetch(&self) -> Result<Dataset> {
        let dataset = self.fetch_all().await.map_err(|e| match e {
            Error::Upstream(_) => e,
            other => {
                warn!(error = %other, "World Bank fetch failed");
                Error::Upstream(format!("World Bank fetch failed: {}", other))
            }
        })?;

        if dataset.is_empty() {
            return Err(Error::Upstream(format!(
                "World Bank returned no data for {} ({}:{})",
                self.indicator, self.start_year, self.end_year
            )));
        }

        info!(
            records = dataset.len(),
            countries = dataset.countries().len(),
            "Fetched inflation data"
        );
        Ok(dataset)
    }
}

/// A fixed dataset, e.g. a CSV/JSON snapshot
pub struct StaticSource {
    name: String,
    dataset: Dataset,
}

impl StaticSource {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            name: "static".to_string(),
            dataset,
        }
    }

    /// Load a `.csv` or `.json` snapshot
    pub fn from_path(path: &Path) -> Result<Self> {
        let dataset = load_snapshot(path)?;
        Ok(Self {
            name: path.display().to_string(),
            dataset,
        })
    }
}

#[async_trait]
impl InflationSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Dataset> {
        if self.dataset.is_empty() {
            return Err(Error::Upstream(format!("{} contains no records", self.name)));
        }
        Ok(self.dataset.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_dataset, MockMode, MockWorldBankServer, MOCK_NULL_ENTRIES};
    use serde_json::json;

    fn client_for(server: &MockWorldBankServer, per_page: u32) -> WorldBankClient {
        let config = SourceConfig {
            base_url: server.url(),
            start_year: 2019,
            end_year: 2022,
            per_page,
            ..Default::default()
        };
        WorldBankClient::new(&config).unwrap()
    }

    #[test]
    fn test_parse_page_skips_nulls() {
        let body = json!([
            {"page": 1, "pages": 3, "per_page": "2", "total": 6},
            [
                {"country": {"id": "DE", "value": "Germany"}, "countryiso3code": "DEU", "date": "2022", "value": 6.9},
                {"country": {"id": "DE", "value": "Germany"}, "countryiso3code": "DEU", "date": "2021", "value": null}
            ]
        ]);
        let page = parse_page(&body).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.pages, 3);
        assert_eq!(page.entries, 2);
        assert_eq!(page.skipped, 1);
        assert_eq!(
            page.records,
            vec![InflationRecord::new("Germany", "DEU", 2022, 6.9)]
        );
    }

    #[test]
    fn test_parse_page_string_metadata_and_bad_dates() {
        let body = json!([
            {"page": "2", "pages": "2"},
            [
                {"country": {"value": "Chile"}, "countryiso3code": "CHL", "date": "2020", "value": 3.0},
                {"country": {"value": "Chile"}, "countryiso3code": "CHL", "date": "2020Q1", "value": 1.0},
                {"date": "2020", "value": 1.0}
            ]
        ]);
        let page = parse_page(&body).unwrap();
        assert_eq!((page.page, page.pages), (2, 2));
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.skipped, 2);
    }

    #[test]
    fn test_parse_page_empty_and_errors() {
        let empty = parse_page(&json!([{"page": 1, "pages": 0}, null])).unwrap();
        assert_eq!(empty.entries, 0);

        let message = json!([{"message": [{"id": "120", "key": "Invalid value"}]}]);
        assert!(matches!(parse_page(&message), Err(Error::Upstream(_))));

        assert!(matches!(
            parse_page(&json!({"oops": true})),
            Err(Error::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_walks_all_pages() {
        let expected = sample_dataset();
        let server = MockWorldBankServer::start(expected.clone()).await;
        let client = client_for(&server, 5);

        let dataset = client.fetch().await.unwrap();
        assert_eq!(dataset.len(), expected.len());
        assert_eq!(dataset.value("Argentina", 2022), Some(72.4));

        // Every page is requested once; the mock's null entries are dropped
        let entries = expected.len() + MOCK_NULL_ENTRIES;
        assert_eq!(server.requests(), (entries + 4) / 5);
    }

    #[tokio::test]
    async fn test_fetch_respects_date_range() {
        let server = MockWorldBankServer::start(sample_dataset()).await;
        let client = client_for(&server, 1000).with_years(2021, 2022);
        let dataset = client.fetch().await.unwrap();
        assert_eq!(dataset.years(), vec![2021, 2022]);
        assert_eq!(server.requests(), 1);
    }

    #[tokio::test]
    async fn test_fetch_empty_is_upstream() {
        let server = MockWorldBankServer::start_with_mode(sample_dataset(), MockMode::Empty).await;
        let result = client_for(&server, 100).fetch().await;
        assert!(matches!(result, Err(Error::Upstream(_))));
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_upstream() {
        let server = MockWorldBankServer::start_with_mode(sample_dataset(), MockMode::Fail).await;
        let result = client_for(&server, 100).fetch().await;
        assert!(matches!(result, Err(Error::Upstream(_))));
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticSource::new(sample_dataset());
        assert_eq!(source.name(), "static");
        assert_eq!(source.fetch().await.unwrap(), sample_dataset());

        let empty = StaticSource::new(Dataset::default());
        assert!(matches!(empty.fetch().await, Err(Error::Upstream(_))));
    }

    #[tokio::test]
    async fn test_static_source_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        crate::export::write_json(&sample_dataset(), &path).unwrap();

        let source = StaticSource::from_path(&path).unwrap();
        assert_eq!(source.fetch().await.unwrap().len(), sample_dataset().len());
    }
}
