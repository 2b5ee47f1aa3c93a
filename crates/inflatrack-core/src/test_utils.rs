//! Test utilities for inflatrack-core
//!
//! Provides a small sample dataset, a matching reference table, and a mock
//! World Bank API server for fetch and integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::models::{Dataset, InflationRecord};
use crate::reference::{Coordinates, CountryInfo, CountryReference};

/// Null-valued entries the mock appends after the real records
pub const MOCK_NULL_ENTRIES: usize = 2;

/// Seven reference countries across three regions plus one unknown country
///
/// | Country   | 2019 | 2020 | 2021 | 2022 |
/// |-----------|------|------|------|------|
/// | Germany   | 1.4  | 0.5  | 3.1  | 6.9  |
/// | France    | 1.1  | 0.5  | 1.6  | 5.2  |
/// | Spain     | 0.7  | -0.3 | 3.1  | 8.4  |
/// | Japan     | 0.5  | 0.0  | -0.2 | 2.5  |
/// | China     | 2.9  | 2.4  | 1.0  | 2.0  |
/// | Brazil    | 3.7  | 3.2  | 8.3  | 9.3  |
/// | Argentina | 53.5 | 42.0 | 48.4 | 72.4 |
/// | Atlantis  | 3.0  | 4.0  | 5.0  | 6.0  |
pub fn sample_dataset() -> Dataset {
    let table: &[(&str, &str, [f64; 4])] = &[
        ("Germany", "DEU", [1.4, 0.5, 3.1, 6.9]),
        ("France", "FRA", [1.1, 0.5, 1.6, 5.2]),
        ("Spain", "ESP", [0.7, -0.3, 3.1, 8.4]),
        ("Japan", "JPN", [0.5, 0.0, -0.2, 2.5]),
        ("China", "CHN", [2.9, 2.4, 1.0, 2.0]),
        ("Brazil", "BRA", [3.7, 3.2, 8.3, 9.3]),
        ("Argentina", "ARG", [53.5, 42.0, 48.4, 72.4]),
        ("Atlantis", "ATL", [3.0, 4.0, 5.0, 6.0]),
    ];

    let mut records = Vec::new();
    for (country, code, values) in table {
        for (i, value) in values.iter().enumerate() {
            records.push(InflationRecord::new(country, code, 2019 + i as i32, *value));
        }
    }
    Dataset::new(records)
}

/// Reference entries for the sample countries (Atlantis deliberately absent)
pub fn sample_reference() -> CountryReference {
    let builtin = CountryReference::builtin();
    let names = [
        "Germany",
        "France",
        "Spain",
        "Japan",
        "China",
        "Brazil",
        "Argentina",
    ];
    CountryReference::from_entries(names.iter().map(|name| {
        builtin.get(name).cloned().unwrap_or_else(|| CountryInfo {
            name: name.to_string(),
            coordinates: Coordinates { lat: 0.0, lon: 0.0 },
            region: "Unknown".to_string(),
        })
    }))
}

/// How the mock answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockMode {
    /// Paginated records
    Normal,
    /// `[meta, null]` with zero pages
    Empty,
    /// HTTP 500 on every request
    Fail,
}

#[derive(Clone)]
struct MockState {
    records: Arc<Vec<InflationRecord>>,
    mode: MockMode,
    requests: Arc<AtomicUsize>,
}

/// Mock World Bank API v2 server
pub struct MockWorldBankServer {
    addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockWorldBankServer {
    /// Serve `dataset` on an available port
    pub async fn start(dataset: Dataset) -> Self {
        Self::start_with_mode(dataset, MockMode::Normal).await
    }

    pub async fn start_with_mode(dataset: Dataset, mode: MockMode) -> Self {
        let requests = Arc::new(AtomicUsize::new(0));
        let state = MockState {
            records: Arc::new(dataset.into_records()),
            mode,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/country/all/indicator/:indicator", get(handle_indicator))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL to use as the API root
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of indicator requests served so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockWorldBankServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Deserialize)]
struct IndicatorQuery {
    date: Option<String>,
    per_page: Option<usize>,
    page: Option<usize>,
}

fn parse_range(date: Option<&str>) -> (i32, i32) {
    date.and_then(|d| d.split_once(':'))
        .and_then(|(a, b)| Some((a.parse().ok()?, b.parse().ok()?)))
        .unwrap_or((i32::MIN, i32::MAX))
}

async fn handle_indicator(
    State(state): State<MockState>,
    Path(indicator): Path<String>,
    Query(query): Query<IndicatorQuery>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let per_page = query.per_page.unwrap_or(50).max(1);
    let page = query.page.unwrap_or(1).max(1);

    match state.mode {
        MockMode::Fail => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
        }
        MockMode::Empty => {
            return Json(json!([
                {"page": 1, "pages": 0, "per_page": per_page, "total": 0},
                null
            ]))
            .into_response();
        }
        MockMode::Normal => {}
    }

    let (from, to) = parse_range(query.date.as_deref());
    let mut entries: Vec<Value> = state
        .records
        .iter()
        .filter(|r| r.year >= from && r.year <= to)
        .map(|r| {
            json!({
                "indicator": {"id": indicator, "value": "Inflation, consumer prices (annual %)"},
                "country": {"id": &r.country_code[..2.min(r.country_code.len())], "value": r.country},
                "countryiso3code": r.country_code,
                "date": r.year.to_string(),
                "value": r.inflation,
                "unit": "",
                "obs_status": "",
                "decimal": 1
            })
        })
        .collect();
    for _ in 0..MOCK_NULL_ENTRIES {
        entries.push(json!({
            "indicator": {"id": indicator, "value": "Inflation, consumer prices (annual %)"},
            "country": {"id": "XX", "value": "Nowhere"},
            "countryiso3code": "XXX",
            "date": "2020",
            "value": null,
            "unit": "",
            "obs_status": "",
            "decimal": 1
        }));
    }

    let total = entries.len();
    let pages = total.div_ceil(per_page);
    let start = ((page - 1) * per_page).min(total);
    let end = (start + per_page).min(total);

    Json(json!([
        {"page": page, "pages": pages, "per_page": per_page.to_string(), "total": total},
        &entries[start..end]
    ]))
    .into_response()
}
