//! Temperature Anomaly Detector - Backend
//!
//! Loads a historical per-city temperature dataset, runs the seasonal
//! anomaly-detection pipeline once and serves the labeled series, the bounds
//! table and live temperature checks over HTTP.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod dataset;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
use services::AnalysisService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub analysis: Arc<AnalysisService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(analysis: AnalysisService, config: Config) -> Self {
        Self {
            analysis: Arc::new(analysis),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Temperature Anomaly Detector API v1.0"
}
