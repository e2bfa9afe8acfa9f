//! Common types used across the engine

use serde::{Deserialize, Serialize};

/// Wall-clock instant in epoch milliseconds
pub type EpochMillis = i64;

/// Wall-clock instant in epoch seconds
pub type EpochSeconds = i64;

/// Display unit for temperatures.
///
/// Fahrenheit is canonical in every model; Celsius only exists at presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Fahrenheit,
    Celsius,
}

impl TemperatureUnit {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fahrenheit" | "f" => Some(TemperatureUnit::Fahrenheit),
            "celsius" | "c" => Some(TemperatureUnit::Celsius),
            _ => None,
        }
    }

    /// Convert an absolute Fahrenheit temperature for display
    pub fn convert_temp(&self, temp_f: f64) -> f64 {
        match self {
            TemperatureUnit::Fahrenheit => temp_f,
            TemperatureUnit::Celsius => (temp_f - 32.0) * 5.0 / 9.0,
        }
    }

    /// Convert a Fahrenheit rate (degrees per minute); rates carry no offset
    pub fn convert_rate(&self, rate_f: f64) -> f64 {
        match self {
            TemperatureUnit::Fahrenheit => rate_f,
            TemperatureUnit::Celsius => rate_f * 5.0 / 9.0,
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemperatureUnit::Fahrenheit => write!(f, "Fahrenheit"),
            TemperatureUnit::Celsius => write!(f, "Celsius"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_temp() {
        assert_eq!(TemperatureUnit::Fahrenheit.convert_temp(400.0), 400.0);
        assert!((TemperatureUnit::Celsius.convert_temp(212.0) - 100.0).abs() < 1e-9);
        assert!((TemperatureUnit::Celsius.convert_temp(32.0)).abs() < 1e-9);
    }

    #[test]
    fn test_convert_rate_has_no_offset() {
        assert!((TemperatureUnit::Celsius.convert_rate(18.0) - 10.0).abs() < 1e-9);
        assert_eq!(TemperatureUnit::Celsius.convert_rate(0.0), 0.0);
    }

    #[test]
    fn test_unit_from_str() {
        assert_eq!(TemperatureUnit::from_str("Celsius"), Some(TemperatureUnit::Celsius));
        assert_eq!(TemperatureUnit::from_str("f"), Some(TemperatureUnit::Fahrenheit));
        assert_eq!(TemperatureUnit::from_str("kelvin"), None);
    }
}
