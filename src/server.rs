//! HTTP boundary for the image search service.
//!
//! ## Endpoints
//!
//! - `GET /api/search?query=..&per_page=..&sources=..`: aggregated search
//! - `GET /api/health`: liveness probe
//!
//! Input is validated here before the aggregator runs, so a rejected
//! request never reaches a provider. CORS is permissive on every route.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use montage_search::{Aggregator, SourceFilter};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::{MontageConfig, ServerConfig};
use crate::error::{Result, ServiceError};

const MISSING_QUERY: &str = "Query parameter is required";
const BAD_PER_PAGE: &str = "per_page must be a positive integer";

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<Aggregator>,
    default_limit: usize,
}

impl AppState {
    /// Serve searches through `aggregator`, asking each provider for
    /// `default_limit` results when a request gives no `per_page`.
    pub fn new(aggregator: Arc<Aggregator>, default_limit: usize) -> Self {
        Self {
            aggregator,
            default_limit,
        }
    }

    /// Build the aggregator and defaults from service configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the search settings are invalid.
    pub fn from_config(config: &MontageConfig) -> Result<Self> {
        let search = config.to_search_config();
        let aggregator = Aggregator::from_config(&search)?;
        Ok(Self::new(Arc::new(aggregator), search.per_source_limit))
    }
}

/// Query string accepted by `/api/search`. Every field is optional so that
/// validation, not extraction, decides the error body.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub per_page: Option<String>,
    pub sources: Option<String>,
}

/// Build the router with all routes and CORS applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", get(handle_search))
        .route("/api/health", get(handle_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// SearchServer
// ---------------------------------------------------------------------------

/// The HTTP boundary running on a background task.
pub struct SearchServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl SearchServer {
    /// Start serving in a background tokio task.
    ///
    /// Binds to `{config.host}:{config.port}` (use port `0` for auto-assign).
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Bind`] if the TCP listener cannot bind.
    pub async fn start(state: AppState, config: &ServerConfig) -> Result<Self> {
        let listener = bind(config).await?;
        let addr = listener
            .local_addr()
            .map_err(|e| ServiceError::Bind(format!("failed to get local addr: {e}")))?;

        info!("image search listening on http://{addr}/api");

        let app = router(state);
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("image search server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for SearchServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Run the service in the foreground until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the listener cannot
/// bind, or the server fails while running.
pub async fn serve(config: &MontageConfig) -> Result<()> {
    config.validate()?;
    let state = AppState::from_config(config)?;
    let listener = bind(&config.server).await?;
    if let Ok(addr) = listener.local_addr() {
        info!("image search listening on http://{addr}/api");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("received Ctrl+C, shutting down...");
            }
        })
        .await?;
    Ok(())
}

async fn bind(config: &ServerConfig) -> Result<TcpListener> {
    let bind_addr = format!("{}:{}", config.host, config.port);
    TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| ServiceError::Bind(format!("{bind_addr}: {e}")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Resolve `per_page`, falling back to `default` when absent.
fn parse_per_page(raw: Option<&str>, default: usize) -> Option<usize> {
    match raw {
        None => Some(default),
        Some(raw) => raw.trim().parse::<usize>().ok().filter(|n| *n > 0),
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// `GET /api/search`: aggregate every selected provider.
async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let Some(query) = params.query.filter(|q| !q.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, MISSING_QUERY);
    };
    let Some(limit) = parse_per_page(params.per_page.as_deref(), state.default_limit) else {
        return error_response(StatusCode::BAD_REQUEST, BAD_PER_PAGE);
    };
    let filter = params
        .sources
        .as_deref()
        .map(SourceFilter::parse)
        .unwrap_or_default();

    match state.aggregator.aggregate(&query, limit, &filter).await {
        Ok(response) => {
            info!(total = response.total, %filter, "search served");
            Json(response).into_response()
        }
        Err(err) if err.is_client_error() => {
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
        Err(err) => {
            tracing::error!(error = %err, "search failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "search failed")
        }
    }
}

/// `GET /api/health`: liveness probe.
async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
