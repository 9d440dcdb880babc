//! HTTP handlers for anomaly analysis endpoints

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    validate_city, BoundsRow, DateRange, SeasonStatistics, SeasonalProfile, SmoothedPoint,
    TemperatureCheck,
};

use crate::error::{AppError, AppResult};
use crate::services::analysis::{AnalysisSummary, CitySummary};
use crate::services::{ObservationFilter, ReportingService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FormatQuery {
    pub format: Option<String>, // "json" or "csv"
}

#[derive(Debug, Deserialize)]
pub struct ObservationQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub anomalies_only: Option<bool>,
    pub format: Option<String>,
}

/// Input for checking a new temperature reading
#[derive(Debug, Deserialize, Serialize)]
pub struct CheckTemperatureRequest {
    pub city: String,
    pub temperature: f64,
    /// Defaults to today's UTC date
    pub date: Option<NaiveDate>,
}

/// Get run summary
pub async fn get_summary(State(state): State<AppState>) -> Json<AnalysisSummary> {
    Json(state.analysis.summary())
}

/// List cities in the dataset
pub async fn list_cities(State(state): State<AppState>) -> Json<Vec<CitySummary>> {
    Json(state.analysis.cities())
}

/// Get the full bounds table
pub async fn get_bounds(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> AppResult<Response> {
    let rows = state.analysis.bounds_rows();
    respond(rows, query.format.as_deref(), "bounds.csv")
}

/// Get bounds for one city
pub async fn get_city_bounds(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> AppResult<Json<Vec<BoundsRow>>> {
    Ok(Json(state.analysis.city_bounds(&city)?))
}

/// Get a city's labeled observations
pub async fn get_city_observations(
    State(state): State<AppState>,
    Path(city): Path<String>,
    Query(query): Query<ObservationQuery>,
) -> AppResult<Response> {
    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        if start > end {
            return Err(AppError::Validation {
                field: "start_date".to_string(),
                message: "start_date must not be after end_date".to_string(),
                message_ru: "Начальная дата не может быть позже конечной".to_string(),
            });
        }
    }

    let filter = ObservationFilter {
        range: DateRange::new(query.start_date, query.end_date),
        anomalies_only: query.anomalies_only.unwrap_or(false),
    };
    let data = state.analysis.city_observations(&city, &filter)?;
    respond(data, query.format.as_deref(), "observations.csv")
}

/// Get a city's smoothed series
pub async fn get_city_smoothed(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> AppResult<Json<Vec<SmoothedPoint>>> {
    Ok(Json(state.analysis.city_smoothed(&city)?))
}

/// Get descriptive statistics per season
pub async fn get_city_statistics(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> AppResult<Json<Vec<SeasonStatistics>>> {
    Ok(Json(state.analysis.season_statistics(&city)?))
}

/// Get seasonal daily profiles
pub async fn get_city_profiles(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> AppResult<Json<Vec<SeasonalProfile>>> {
    Ok(Json(state.analysis.seasonal_profiles(&city)?))
}

/// Check whether a temperature is anomalous for its city and season
pub async fn check_temperature(
    State(state): State<AppState>,
    Json(input): Json<CheckTemperatureRequest>,
) -> AppResult<Json<TemperatureCheck>> {
    validate_city(&input.city).map_err(|msg| AppError::Validation {
        field: "city".to_string(),
        message: msg.to_string(),
        message_ru: "Название города не может быть пустым".to_string(),
    })?;

    let date = input.date.unwrap_or_else(|| Utc::now().date_naive());
    let check = state
        .analysis
        .check_temperature(&input.city, input.temperature, date)?;

    tracing::debug!(
        city = %check.city,
        season = %check.season,
        temperature = check.temperature,
        anomalous = check.is_anomalous,
        "Checked temperature"
    );

    Ok(Json(check))
}

fn respond<T: Serialize>(
    data: Vec<T>,
    format: Option<&str>,
    filename: &str,
) -> AppResult<Response> {
    if format == Some("csv") {
        let csv = ReportingService::export_to_csv(&data)?;
        let disposition = format!("attachment; filename=\"{}\"", filename);
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(data).into_response())
    }
}
