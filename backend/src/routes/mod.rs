//! Route definitions for the Temperature Anomaly Detector

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/summary", get(handlers::get_summary))
        .route("/bounds", get(handlers::get_bounds))
        // Live comparison of a new reading against historical bounds
        .route("/check", post(handlers::check_temperature))
        .nest("/cities", city_routes())
}

/// Per-city routes
fn city_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_cities))
        .route("/:city/bounds", get(handlers::get_city_bounds))
        .route("/:city/observations", get(handlers::get_city_observations))
        .route("/:city/smoothed", get(handlers::get_city_smoothed))
        .route("/:city/statistics", get(handlers::get_city_statistics))
        .route("/:city/profiles", get(handlers::get_city_profiles))
}
