//! WebAssembly module for the Temperature Anomaly Detector
//!
//! Provides client-side computation for:
//! - Season lookup for a calendar date
//! - Band membership checks
//! - Checking a reading against an exported bounds table

use chrono::NaiveDate;
use shared::{check_temperature, season_for, BoundsRow, BoundsTable, GroupBounds};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Season name for an ISO date (`YYYY-MM-DD`)
#[wasm_bindgen]
pub fn season_for_date(iso_date: &str) -> Result<String, JsValue> {
    season_name(iso_date).map_err(|e| JsValue::from_str(&e))
}

/// Whether `temperature` lies inside the inclusive band `[low, high]`
#[wasm_bindgen]
pub fn is_within_band(temperature: f64, low: f64, high: f64) -> bool {
    GroupBounds {
        mean: (low + high) / 2.0,
        std: 0.0,
        low,
        high,
    }
    .contains(temperature)
}

/// Check a reading against a bounds table exported as JSON rows
#[wasm_bindgen]
pub fn check_against_bounds(
    bounds_json: &str,
    city: &str,
    iso_date: &str,
    temperature: f64,
) -> Result<bool, JsValue> {
    is_anomalous(bounds_json, city, iso_date, temperature).map_err(|e| JsValue::from_str(&e))
}

fn parse_date(iso_date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(iso_date.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", iso_date, e))
}

fn season_name(iso_date: &str) -> Result<String, String> {
    Ok(season_for(parse_date(iso_date)?).to_string())
}

fn is_anomalous(
    bounds_json: &str,
    city: &str,
    iso_date: &str,
    temperature: f64,
) -> Result<bool, String> {
    let rows: Vec<BoundsRow> = serde_json::from_str(bounds_json)
        .map_err(|e| format!("Invalid bounds JSON: {}", e))?;
    let table = BoundsTable::from_rows(rows);
    let date = parse_date(iso_date)?;

    check_temperature(&table, city, date, temperature)
        .map(|check| check.is_anomalous)
        .map_err(|e| e.to_string())
}
