//! Validation utilities for the Temperature Anomaly Detector
//!
//! Checks applied to the input dataset and to pipeline parameters before any
//! computation starts.

/// Column layout the historical dataset must have, in order
pub const REQUIRED_COLUMNS: [&str; 4] = ["city", "timestamp", "temperature", "season"];

// ============================================================================
// Dataset Validations
// ============================================================================

/// Validate that the header is exactly `city, timestamp, temperature, season`
pub fn validate_columns(headers: &[&str]) -> Result<(), &'static str> {
    if headers.len() != REQUIRED_COLUMNS.len() {
        return Err("Dataset must have exactly the columns city, timestamp, temperature, season");
    }
    if headers
        .iter()
        .zip(REQUIRED_COLUMNS.iter())
        .any(|(got, want)| got.trim() != *want)
    {
        return Err("Dataset columns must be city, timestamp, temperature, season in that order");
    }
    Ok(())
}

/// Validate a city name
pub fn validate_city(city: &str) -> Result<(), &'static str> {
    if city.trim().is_empty() {
        return Err("City name cannot be empty");
    }
    Ok(())
}

/// Validate that a temperature reading is a finite number
pub fn validate_temperature(temperature: f64) -> Result<(), &'static str> {
    if !temperature.is_finite() {
        return Err("Temperature must be a finite number");
    }
    Ok(())
}

// ============================================================================
// Parameter Validations
// ============================================================================

/// Validate smoothing window size
pub fn validate_window(window: usize) -> Result<(), &'static str> {
    if window == 0 {
        return Err("must be at least 1");
    }
    Ok(())
}

/// Validate band multiplier (finite, non-negative)
pub fn validate_band_multiplier(multiplier: f64) -> Result<(), &'static str> {
    if !multiplier.is_finite() {
        return Err("must be a finite number");
    }
    if multiplier < 0.0 {
        return Err("cannot be negative");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Dataset Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_columns_valid() {
        assert!(validate_columns(&["city", "timestamp", "temperature", "season"]).is_ok());
    }

    #[test]
    fn test_validate_columns_wrong_order() {
        assert!(validate_columns(&["timestamp", "city", "temperature", "season"]).is_err());
    }

    #[test]
    fn test_validate_columns_extra_or_missing() {
        assert!(validate_columns(&["city", "timestamp", "temperature"]).is_err());
        assert!(
            validate_columns(&["city", "timestamp", "temperature", "season", "humidity"]).is_err()
        );
        assert!(validate_columns(&[]).is_err());
    }

    #[test]
    fn test_validate_city() {
        assert!(validate_city("Moscow").is_ok());
        assert!(validate_city("").is_err());
        assert!(validate_city("   ").is_err());
    }

    #[test]
    fn test_validate_temperature() {
        assert!(validate_temperature(-40.5).is_ok());
        assert!(validate_temperature(0.0).is_ok());
        assert!(validate_temperature(f64::NAN).is_err());
        assert!(validate_temperature(f64::NEG_INFINITY).is_err());
    }

    // ========================================================================
    // Parameter Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_window() {
        assert!(validate_window(1).is_ok());
        assert!(validate_window(30).is_ok());
        assert!(validate_window(0).is_err());
    }

    #[test]
    fn test_validate_band_multiplier() {
        assert!(validate_band_multiplier(2.0).is_ok());
        assert!(validate_band_multiplier(0.0).is_ok());
        assert!(validate_band_multiplier(-0.5).is_err());
        assert!(validate_band_multiplier(f64::NAN).is_err());
    }
}
