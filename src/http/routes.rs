//! HTTP route definitions

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use super::{appliances, bills, household, shopping};
use crate::app::AppState;
use crate::util::time::uptime_secs;

pub const SERVICE_NAME: &str = "My House - Personal Fortress";

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health_handler))
        .merge(bills::router())
        .merge(shopping::router())
        .merge(household::router())
        .merge(appliances::router());

    Router::new()
        .nest("/api", api)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(state.config.client_origin.as_deref()))
        .with_state(state)
}

/// CORS for the configured origins (comma-separated), any origin when unset
fn cors_layer(client_origin: Option<&str>) -> CorsLayer {
    let Some(origins) = client_origin else {
        return CorsLayer::permissive();
    };

    let allowed_origins: Vec<HeaderValue> = origins
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    timestamp: DateTime<Utc>,
    uptime_secs: u64,
    connected_appliances: usize,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: Utc::now(),
        uptime_secs: uptime_secs(),
        connected_appliances: state.appliances.connected_count(),
    })
}
