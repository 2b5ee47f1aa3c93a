//! Inflatrack Web Server
//!
//! Axum-based JSON API over the inflation analytics, consumed by an external
//! dashboard UI.
//!
//! - One time-boxed dataset cache shared by every request
//! - Optional scheduled refresh (`INFLATRACK_REFRESH_HOURS`)
//! - Restrictive CORS policy unless origins are configured
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Duration;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use inflatrack_core::{AppConfig, CountryReference, InflationSource};

mod handlers;
mod scheduler;
mod store;

pub use scheduler::{start_refresh_scheduler, RefreshScheduleConfig};
pub use store::{CacheStatus, DatasetStore};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// How long a fetched dataset is served before re-fetching
    pub ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            ttl: Duration::seconds(3600),
        }
    }
}

impl ServerConfig {
    /// Defaults from the app config, origins from `INFLATRACK_ALLOWED_ORIGINS`
    pub fn from_env(app: &AppConfig) -> Self {
        let allowed_origins = std::env::var("INFLATRACK_ALLOWED_ORIGINS")
            .map(|raw| inflatrack_core::selection::parse_list(&raw))
            .unwrap_or_default();
        Self {
            allowed_origins,
            ttl: app.cache.ttl(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub store: DatasetStore,
    pub reference: CountryReference,
    /// Analysis defaults (cluster count, top-n, thresholds)
    pub config: AppConfig,
    pub server: ServerConfig,
}

impl AppState {
    pub fn new(
        source: Arc<dyn InflationSource>,
        reference: CountryReference,
        config: AppConfig,
        server: ServerConfig,
    ) -> Self {
        Self {
            store: DatasetStore::new(source, server.ttl),
            reference,
            config,
            server,
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>, static_dir: Option<&str>) -> Router {
    let api_routes = Router::new()
        // Status
        .route("/health", get(handlers::health))
        .route("/meta", get(handlers::meta))
        .route("/refresh", post(handlers::refresh))
        // Map
        .route("/map", get(handlers::map))
        .route("/map/summary", get(handlers::map_summary))
        .route("/insights", get(handlers::insights))
        // Calculator
        .route("/adjust", get(handlers::adjust))
        // Patterns and comparison
        .route("/clusters", get(handlers::clusters))
        .route("/similar", get(handlers::similar))
        .route("/compare", get(handlers::compare))
        .route("/countries/:name/stats", get(handlers::country_stats))
        // Export
        .route("/export", get(handlers::export_data))
        .route("/export/summary", get(handlers::export_summary));

    // Build CORS layer
    let cors = if state.server.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = state
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Serve the dashboard bundle if a directory is provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    state: Arc<AppState>,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    // Warm the cache so the first request does not pay for the fetch
    match state.store.current().await {
        Ok(dataset) => info!(
            "✅ Loaded {} records from {}",
            dataset.len(),
            state.store.source_name()
        ),
        Err(e) => warn!("⚠️  Initial data load failed, will retry on request: {}", e),
    }

    if let Some(schedule) = RefreshScheduleConfig::from_env() {
        start_refresh_scheduler(state.clone(), schedule);
    }

    let app = create_router(state, static_dir);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

/// Status for analytics errors the caller can act on
fn client_status(err: &inflatrack_core::Error) -> Option<StatusCode> {
    use inflatrack_core::Error;

    match err {
        Error::NotFound(_) => Some(StatusCode::NOT_FOUND),
        Error::Unavailable(_) => Some(StatusCode::UNPROCESSABLE_ENTITY),
        Error::InvalidData(_) => Some(StatusCode::BAD_REQUEST),
        Error::Upstream(_) => Some(StatusCode::SERVICE_UNAVAILABLE),
        _ => None,
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        if let Some(status) = err
            .downcast_ref::<inflatrack_core::Error>()
            .and_then(client_status)
        {
            return Self {
                status,
                message: err.to_string(),
                internal: None,
            };
        }
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
