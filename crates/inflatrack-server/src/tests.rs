//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use inflatrack_core::test_utils::{sample_dataset, sample_reference};
use inflatrack_core::{Dataset, StaticSource};
use tower::ServiceExt;

fn test_state(dataset: Dataset) -> Arc<AppState> {
    Arc::new(AppState::new(
        Arc::new(StaticSource::new(dataset)),
        sample_reference(),
        AppConfig::default(),
        ServerConfig::default(),
    ))
}

fn setup_test_app() -> Router {
    create_router(test_state(sample_dataset()), None)
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn get_body_json(response: Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ========== Status API Tests ==========

#[tokio::test]
async fn test_health() {
    let response = get(setup_test_app(), "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_meta() {
    let response = get(setup_test_app(), "/api/meta").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["years"], serde_json::json!([2019, 2020, 2021, 2022]));
    assert_eq!(
        json["regions"],
        serde_json::json!(["Asia", "Europe", "South America"])
    );
    // Atlantis has records but no coordinates
    assert_eq!(json["countries"], 7);
    assert_eq!(json["records"], 32);
    assert_eq!(json["cache"]["source"], "static");
    assert_eq!(json["default_clusters"], 4);
}

#[tokio::test]
async fn test_refresh() {
    let app = setup_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["records"], 32);
    assert!(json["fetched_at"].is_string());
}

#[tokio::test]
async fn test_empty_source_is_service_unavailable() {
    let app = create_router(test_state(Dataset::default()), None);
    let response = get(app, "/api/map").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("no records"));
}

// ========== Map API Tests ==========

#[tokio::test]
async fn test_map_defaults_to_latest_year() {
    let response = get(setup_test_app(), "/api/map").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0]["country"], "Argentina");
    assert_eq!(rows[0]["inflation"], 72.4);
    assert!(rows.iter().all(|r| r["country"] != "Atlantis"));
}

#[tokio::test]
async fn test_map_region_filter() {
    let response = get(setup_test_app(), "/api/map?year=2020&regions=Europe").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let countries: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["country"].as_str().unwrap())
        .collect();
    assert_eq!(countries, vec!["France", "Germany", "Spain"]);
}

#[tokio::test]
async fn test_map_unknown_region() {
    let response = get(setup_test_app(), "/api/map?regions=Europe,Atlantis").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Atlantis"));
}

#[tokio::test]
async fn test_map_highlights() {
    let response = get(
        setup_test_app(),
        "/api/map?year=2020&highlight_deflation=true&country=Japan",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let rows = json.as_array().unwrap();
    let color_of = |country: &str| {
        rows.iter()
            .find(|r| r["country"] == country)
            .map(|r| r["color"].clone())
            .unwrap()
    };
    assert_eq!(color_of("Spain"), serde_json::json!([0, 255, 255, 255]));
    assert_eq!(color_of("Japan"), serde_json::json!([255, 255, 0, 255]));
    // Unhighlighted rows keep their band color (0.5 is low inflation)
    assert_eq!(color_of("Germany"), serde_json::json!([0, 200, 100, 200]));
}

#[tokio::test]
async fn test_map_summary() {
    let response = get(setup_test_app(), "/api/map/summary?year=2022").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["countries"], 7);
    assert_eq!(json["highest"]["country"], "Argentina");
    assert_eq!(json["lowest"]["country"], "China");
}

#[tokio::test]
async fn test_map_summary_missing_year() {
    let response = get(setup_test_app(), "/api/map/summary?year=1990").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Insight API Tests ==========

#[tokio::test]
async fn test_insights_for_region_and_country() {
    let response = get(
        setup_test_app(),
        "/api/insights?year=2022&regions=Europe&country=Germany",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let insights = json.as_array().unwrap();
    let kinds: Vec<&str> = insights
        .iter()
        .map(|i| i["kind"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["regional_average", "geographic_pattern", "country_trend"]
    );
    assert_eq!(
        insights[0]["message"],
        "In 2022, the selected regions have an average inflation rate of 6.83%."
    );
    assert_eq!(
        insights[2]["message"],
        "Inflation in Germany has generally increased over the available period."
    );
}

#[tokio::test]
async fn test_insights_read_full_history() {
    // A year range does not narrow the table behind the trend statement
    let response = get(
        setup_test_app(),
        "/api/insights?year=2022&regions=Europe&country=Germany&from=2022&to=2022",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let kinds: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["kind"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["regional_average", "geographic_pattern", "country_trend"]
    );

    // Nor does it empty the map year
    let response = get(setup_test_app(), "/api/insights?year=2020&from=2021&to=2022").await;
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_insights_alerts_without_regions() {
    let response = get(setup_test_app(), "/api/insights?year=2020").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let kinds: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["kind"].as_str().unwrap())
        .collect();
    // Argentina above 10%, Spain below zero
    assert_eq!(
        kinds,
        vec!["geographic_pattern", "high_inflation", "deflation"]
    );
}

// ========== Calculator API Tests ==========

#[tokio::test]
async fn test_adjust() {
    let response = get(
        setup_test_app(),
        "/api/adjust?country=Germany&from=2019&to=2022&amount=100",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let points = json["points"].as_array().unwrap();
    assert_eq!(points.len(), 4);
    assert_eq!(points[0]["price_index"], 100.0);
    assert_eq!(points[0]["adjusted_value"], 100.0);

    let expected = 100.0 * 1.005 * 1.031 * 1.069;
    let final_value = json["final_value"].as_f64().unwrap();
    assert!((final_value - expected).abs() < 1e-9);
    assert_eq!(json["country"], "Germany");
}

#[tokio::test]
async fn test_adjust_invalid_range() {
    let response = get(
        setup_test_app(),
        "/api/adjust?country=Germany&from=2022&to=2019",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_adjust_unknown_country() {
    let response = get(
        setup_test_app(),
        "/api/adjust?country=Narnia&from=2019&to=2022",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Pattern API Tests ==========

#[tokio::test]
async fn test_clusters() {
    let response = get(setup_test_app(), "/api/clusters?k=3").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["k"], 3);
    let clusters = json["clusters"].as_array().unwrap();
    assert_eq!(clusters.len(), 3);
    let members: usize = clusters
        .iter()
        .map(|c| c["members"].as_array().unwrap().len())
        .sum();
    assert_eq!(members, 7);
}

#[tokio::test]
async fn test_clusters_deterministic() {
    let first = get_body_json(get(setup_test_app(), "/api/clusters?k=2").await).await;
    let second = get_body_json(get(setup_test_app(), "/api/clusters?k=2").await).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_clusters_too_many() {
    let response = get(setup_test_app(), "/api/clusters?k=4&regions=Asia").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_similar() {
    let response = get(setup_test_app(), "/api/similar?country=Germany&top=3").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let matches = json.as_array().unwrap();
    assert_eq!(matches.len(), 3);
    assert!(matches.iter().all(|m| m["country"] != "Germany"));
    assert!(matches
        .windows(2)
        .all(|w| w[0]["score"].as_f64() >= w[1]["score"].as_f64()));
    assert!(matches[0]["strength"].is_string());
}

#[tokio::test]
async fn test_similar_within_regions() {
    let response = get(
        setup_test_app(),
        "/api/similar?country=Germany&regions=Europe",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let mut countries: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["country"].as_str().unwrap())
        .collect();
    countries.sort();
    assert_eq!(countries, vec!["France", "Spain"]);

    // The target must itself fall inside the filter
    let response = get(setup_test_app(), "/api/similar?country=Japan&regions=Europe").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_similar_unmapped_country() {
    let response = get(setup_test_app(), "/api/similar?country=Atlantis").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Comparison API Tests ==========

#[tokio::test]
async fn test_compare_with_rolling() {
    let response = get(
        setup_test_app(),
        "/api/compare?countries=France,Spain&rolling=true",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let series = json.as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["country"], "France");
    let rolling = series[0]["rolling"].as_array().unwrap();
    assert_eq!(rolling.len(), 4);
    assert!(rolling[0].is_null());
    assert!(rolling[3].is_null());
}

#[tokio::test]
async fn test_compare_requires_countries() {
    let response = get(setup_test_app(), "/api/compare?countries=").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let too_many = (0..11).map(|i| format!("C{}", i)).collect::<Vec<_>>().join(",");
    let response = get(
        setup_test_app(),
        &format!("/api/compare?countries={}", too_many),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_country_stats() {
    let response = get(setup_test_app(), "/api/countries/Japan/stats?year=2021").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["current"], -0.2);
    assert_eq!(json["max"], 2.5);
    assert_eq!(json["max_year"], 2022);
    assert_eq!(json["min"], -0.2);
    assert_eq!(json["min_year"], 2021);
    assert_eq!(json["observations"], 4);
}

#[tokio::test]
async fn test_country_stats_not_found() {
    let response = get(setup_test_app(), "/api/countries/Narnia/stats").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Export API Tests ==========

#[tokio::test]
async fn test_export_csv() {
    let response = get(
        setup_test_app(),
        "/api/export?from=2022&to=2022&regions=Asia",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"inflation_data_2022_2022.csv\""
    );

    let body = get_body_text(response).await;
    assert_eq!(
        body,
        "country,country_code,year,inflation\nChina,CHN,2022,2.0\nJapan,JPN,2022,2.5\n"
    );
}

#[tokio::test]
async fn test_export_summary() {
    let response = get(
        setup_test_app(),
        "/api/export/summary?year=2021&regions=Europe&compare=France,Spain",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = get_body_text(response).await;
    assert!(body.starts_with("Global Inflation Analysis Summary\n"));
    assert!(body.contains("- Year: 2021\n"));
    assert!(body.contains("- Countries: 3\n"));
    assert!(body.contains("Comparison Countries: France, Spain\n"));
}

// ========== Error Mapping Tests ==========

#[test]
fn test_core_errors_map_to_status() {
    use inflatrack_core::Error;

    let cases = [
        (Error::NotFound("x".into()), StatusCode::NOT_FOUND),
        (Error::Unavailable("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
        (Error::InvalidData("x".into()), StatusCode::BAD_REQUEST),
        (Error::Upstream("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        (Error::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, status) in cases {
        assert_eq!(AppError::from(err).status(), status);
    }
}
