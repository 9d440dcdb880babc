//! Historical dataset loader
//!
//! Reads the CSV file with columns `city, timestamp, temperature, season`
//! into typed observations. Any other column layout is rejected before the
//! pipeline sees the data.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use shared::{
    validate_city, validate_columns, validate_temperature, Observation, PipelineError, Season,
};

use crate::error::AppResult;

/// One CSV row before typing
#[derive(Debug, Deserialize)]
struct RawRecord {
    city: String,
    timestamp: String,
    temperature: f64,
    season: String,
}

/// Parse observations from any CSV reader.
///
/// Errors carry the 1-based line of the offending row.
pub fn load_observations<R: Read>(reader: R) -> Result<Vec<Observation>, PipelineError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| PipelineError::invalid_input(format!("Cannot read header: {}", e)))?
        .clone();
    let names: Vec<&str> = headers.iter().collect();
    validate_columns(&names).map_err(PipelineError::invalid_input)?;

    let mut observations = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            PipelineError::invalid_input_at(line, e.to_string())
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let raw: RawRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| PipelineError::invalid_input_at(line, e.to_string()))?;

        observations.push(parse_record(raw, line)?);
    }

    tracing::debug!(rows = observations.len(), "Loaded historical dataset");
    Ok(observations)
}

/// Open and parse a dataset file
pub fn load_observations_from_path(path: impl AsRef<Path>) -> AppResult<Vec<Observation>> {
    let path = path.as_ref();
    tracing::info!("Loading dataset from {}", path.display());
    let file = File::open(path)?;
    Ok(load_observations(file)?)
}

fn parse_record(raw: RawRecord, line: u64) -> Result<Observation, PipelineError> {
    validate_city(&raw.city).map_err(|msg| PipelineError::invalid_input_at(line, msg))?;
    validate_temperature(raw.temperature)
        .map_err(|msg| PipelineError::invalid_input_at(line, msg))?;

    let timestamp = parse_timestamp(&raw.timestamp).ok_or_else(|| {
        PipelineError::invalid_input_at(line, format!("Unrecognized timestamp '{}'", raw.timestamp))
    })?;
    let season: Season = raw.season.parse().map_err(|e: shared::ParseSeasonError| {
        PipelineError::invalid_input_at(line, e.to_string())
    })?;

    Ok(Observation::new(raw.city, timestamp, raw.temperature, season))
}

/// Accepts a plain date or a date-time; only the date part is kept
pub fn parse_timestamp(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}
