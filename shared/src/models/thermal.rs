//! Temperature sample and Rate of Rise models

use serde::{Deserialize, Serialize};

use crate::types::TemperatureUnit;

/// A bean temperature reading placed on the roast time axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSample {
    pub time_min: f64,
    pub temp: f64,
}

impl TemperatureSample {
    pub fn new(time_min: f64, temp: f64) -> Self {
        Self { time_min, temp }
    }
}

/// Rate of Rise at one sample, in degrees per minute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoRPoint {
    pub time_min: f64,
    pub ror: f64,
}

/// Physical bounds applied to every Rate of Rise value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RorBounds {
    pub min: f64,
    pub max: f64,
}

impl RorBounds {
    pub const FAHRENHEIT_MIN: f64 = -20.0;
    pub const FAHRENHEIT_MAX: f64 = 80.0;

    /// Bounds from two limits in either order.
    ///
    /// A non-finite limit falls back to the Fahrenheit default on its side.
    pub fn new(min: f64, max: f64) -> Self {
        let min = if min.is_finite() { min } else { Self::FAHRENHEIT_MIN };
        let max = if max.is_finite() { max } else { Self::FAHRENHEIT_MAX };
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Whether `min <= max` with both limits finite
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Default bounds for Fahrenheit rates
    pub fn fahrenheit() -> Self {
        Self::new(Self::FAHRENHEIT_MIN, Self::FAHRENHEIT_MAX)
    }

    /// Default bounds expressed in the given unit
    pub fn for_unit(unit: TemperatureUnit) -> Self {
        Self::fahrenheit().in_unit(unit)
    }

    /// Convert Fahrenheit bounds into the given unit
    pub fn in_unit(&self, unit: TemperatureUnit) -> Self {
        Self::new(unit.convert_rate(self.min), unit.convert_rate(self.max))
    }

    /// Clamp a rate into the bounds; never panics, even on inverted bounds
    pub fn clamp(&self, ror: f64) -> f64 {
        ror.max(self.min).min(self.max)
    }
}

impl Default for RorBounds {
    fn default() -> Self {
        Self::fahrenheit()
    }
}
