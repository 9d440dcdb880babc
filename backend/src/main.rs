//! Temperature Anomaly Detector - Backend Server
//!
//! Detects temperature anomalies in historical per-city weather series using
//! seasonally normalized bounds around a rolling mean.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use temperature_anomaly_backend::{
    create_app, dataset, error::AppError, services::AnalysisService, AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tad_server=debug,temperature_anomaly_backend=debug,shared=info,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load().map_err(|e| AppError::Configuration(e.to_string()))?;

    tracing::info!("Starting Temperature Anomaly Detector");
    tracing::info!("Environment: {}", config.environment);

    let pipeline = config.pipeline()?;
    tracing::info!(
        "Pipeline: window={} band_multiplier={}",
        pipeline.window,
        pipeline.band_multiplier
    );

    // Load the historical dataset and run the pipeline once
    let observations = dataset::load_observations_from_path(&config.dataset.path)?;
    let analysis = AnalysisService::new(observations, pipeline)?;

    let summary = analysis.summary();
    tracing::info!(
        "Analyzed {} observations across {} cities: {} anomalies, {} unclassified",
        summary.observations,
        summary.cities,
        summary.anomalies,
        summary.unclassified
    );
    for short in &summary.insufficient_history {
        tracing::warn!(
            "City {} has {} observations, fewer than the window of {}; its readings are unknown",
            short.city,
            short.observations,
            short.window
        );
    }

    // Create application state
    let state = AppState::new(analysis, config.clone());

    // Build application
    let app = create_app(state);

    // Start server
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
