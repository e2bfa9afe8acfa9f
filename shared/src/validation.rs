//! Validation utilities for roast event input
//!
//! Stored events are accepted as-is by the engine; these checks only guard
//! what a client appends.

use thiserror::Error;
use validator::Validate;

use crate::models::{EventKind, NewEvent};

/// Highest plausible bean temperature in Fahrenheit
pub const MAX_BEAN_TEMP_F: f64 = 1000.0;

/// Rejected event input
#[derive(Error, Debug)]
pub enum EventInputError {
    #[error("Invalid field: {0}")]
    Fields(#[from] validator::ValidationErrors),

    #[error("Invalid {field}: {message}")]
    Rule {
        field: &'static str,
        message: &'static str,
    },
}

impl EventInputError {
    fn rule(field: &'static str, message: &'static str) -> Self {
        EventInputError::Rule { field, message }
    }

    /// Name of the offending field, when a single one can be named
    pub fn field(&self) -> String {
        match self {
            EventInputError::Fields(errors) => errors
                .field_errors()
                .keys()
                .next()
                .map(|k| k.to_string())
                .unwrap_or_default(),
            EventInputError::Rule { field, .. } => field.to_string(),
        }
    }
}

// ============================================================================
// Event Input Validations
// ============================================================================

/// Validate an event before it is appended
pub fn validate_new_event(input: &NewEvent) -> Result<(), EventInputError> {
    input.validate()?;

    if let Some(temp) = input.temp_f {
        validate_temperature(temp).map_err(|m| EventInputError::rule("temp_f", m))?;
        if input.resolved_kind() != EventKind::Set && temp != 0.0 {
            return Err(EventInputError::rule(
                "temp_f",
                "Only SET events carry a temperature",
            ));
        }
    }

    Ok(())
}

/// Validate a bean temperature reading; zero is the "unset" sentinel and allowed
pub fn validate_temperature(temp_f: f64) -> Result<(), &'static str> {
    if !temp_f.is_finite() {
        return Err("Temperature must be a finite number");
    }
    if temp_f < 0.0 || temp_f > MAX_BEAN_TEMP_F {
        return Err("Temperature must be between 0 and 1000°F");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_reading() {
        assert!(validate_new_event(&NewEvent::reading(385.0)).is_ok());
        assert!(validate_new_event(&NewEvent::reading(0.0)).is_ok());
    }

    #[test]
    fn test_validate_levels_out_of_range() {
        let input = NewEvent {
            fan_level: Some(10),
            ..Default::default()
        };
        let err = validate_new_event(&input).unwrap_err();
        assert_eq!(err.field(), "fan_level");

        let input = NewEvent {
            heat_level: Some(9),
            fan_level: Some(0),
            ..Default::default()
        };
        assert!(validate_new_event(&input).is_ok());
    }

    #[test]
    fn test_validate_note_length() {
        let input = NewEvent {
            note: Some("x".repeat(501)),
            ..Default::default()
        };
        assert!(validate_new_event(&input).is_err());
    }

    #[test]
    fn test_milestone_cannot_carry_temperature() {
        let input = NewEvent {
            kind: Some(EventKind::FirstCrack),
            temp_f: Some(390.0),
            ..Default::default()
        };
        let err = validate_new_event(&input).unwrap_err();
        assert_eq!(err.field(), "temp_f");
    }

    #[test]
    fn test_validate_temperature() {
        assert!(validate_temperature(420.0).is_ok());
        assert!(validate_temperature(-5.0).is_err());
        assert!(validate_temperature(f64::NAN).is_err());
        assert!(validate_temperature(1500.0).is_err());
    }
}
