//! Boundary validation for soiling requests
//!
//! The computation kernel clamps every finite input instead of failing, so
//! values that make no physical sense have to be rejected here, before
//! they reach it.

use thiserror::Error;

use crate::models::CostOverride;

/// Upper bound on days since cleaning (ten years)
pub const MAX_DAYS_SINCE_CLEANING: i64 = 3650;

/// Upper bound on system capacity in kW
pub const MAX_CAPACITY_KW: f64 = 10_000.0;

/// A rejected input field
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Validate latitude and longitude are finite and on the globe
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ValidationError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(ValidationError::new(
            "lat",
            "Latitude must be between -90 and 90",
        ));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(ValidationError::new(
            "lng",
            "Longitude must be between -180 and 180",
        ));
    }
    Ok(())
}

/// Validate days since cleaning and narrow it to the kernel's type
pub fn validate_days_since_cleaning(days: i64) -> Result<u32, ValidationError> {
    if days < 0 {
        return Err(ValidationError::new(
            "days_since_cleaning",
            "Days since cleaning cannot be negative",
        ));
    }
    if days > MAX_DAYS_SINCE_CLEANING {
        return Err(ValidationError::new(
            "days_since_cleaning",
            "Days since cleaning must be at most 3650",
        ));
    }
    Ok(days as u32)
}

/// Validate system capacity is a positive, plausible number of kW
pub fn validate_capacity_kw(capacity_kw: f64) -> Result<(), ValidationError> {
    if !capacity_kw.is_finite() || capacity_kw <= 0.0 {
        return Err(ValidationError::new(
            "capacity_kw",
            "System capacity must be greater than 0",
        ));
    }
    if capacity_kw > MAX_CAPACITY_KW {
        return Err(ValidationError::new(
            "capacity_kw",
            "System capacity must be at most 10000 kW",
        ));
    }
    Ok(())
}

/// Validate user-supplied cost values are finite and non-negative
///
/// Zero is accepted; the optimizer floors degenerate costs itself.
pub fn validate_cost_override(cost: &CostOverride) -> Result<(), ValidationError> {
    let invalid = |value: Option<f64>| value.is_some_and(|v| !v.is_finite() || v < 0.0);

    if invalid(cost.electricity_rate) {
        return Err(ValidationError::new(
            "electricity_rate",
            "Electricity rate must be a non-negative number",
        ));
    }
    if invalid(cost.cleaning_cost) {
        return Err(ValidationError::new(
            "cleaning_cost",
            "Cleaning cost must be a non-negative number",
        ));
    }
    if let Some(currency) = &cost.currency {
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::new(
                "currency",
                "Currency must be a 3-letter ISO code",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_coordinates_valid() {
        assert!(validate_coordinates(31.5204, 74.3587).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_validate_coordinates_invalid() {
        assert_eq!(validate_coordinates(91.0, 0.0).unwrap_err().field, "lat");
        assert_eq!(validate_coordinates(0.0, -181.0).unwrap_err().field, "lng");
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
        assert!(validate_coordinates(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_days() {
        assert_eq!(validate_days_since_cleaning(0), Ok(0));
        assert_eq!(validate_days_since_cleaning(15), Ok(15));
        assert!(validate_days_since_cleaning(-1).is_err());
        assert!(validate_days_since_cleaning(3651).is_err());
    }

    #[test]
    fn test_validate_capacity() {
        assert!(validate_capacity_kw(5.0).is_ok());
        assert!(validate_capacity_kw(0.0).is_err());
        assert!(validate_capacity_kw(-3.0).is_err());
        assert!(validate_capacity_kw(f64::NAN).is_err());
        assert!(validate_capacity_kw(20_000.0).is_err());
    }

    #[test]
    fn test_validate_cost_override() {
        assert!(validate_cost_override(&CostOverride::default()).is_ok());

        let zero = CostOverride {
            electricity_rate: Some(0.0),
            cleaning_cost: Some(0.0),
            currency: Some("PKR".to_string()),
        };
        assert!(validate_cost_override(&zero).is_ok());

        let negative = CostOverride {
            cleaning_cost: Some(-10.0),
            ..Default::default()
        };
        assert_eq!(validate_cost_override(&negative).unwrap_err().field, "cleaning_cost");

        let bad_currency = CostOverride {
            currency: Some("rupees".to_string()),
            ..Default::default()
        };
        assert_eq!(validate_cost_override(&bad_currency).unwrap_err().field, "currency");
    }

    #[test]
    fn test_error_display() {
        let err = validate_capacity_kw(0.0).unwrap_err();
        assert_eq!(err.to_string(), "capacity_kw: System capacity must be greater than 0");
    }
}
