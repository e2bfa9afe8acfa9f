//! Configuration management for the roast timeline session runtime
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with ROASTLINE_ prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{RorBounds, TemperatureUnit};

/// Main runtime configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TimelineConfig {
    /// Current environment (development, production)
    pub environment: String,

    /// Live ticker configuration
    pub ticker: TickerConfig,

    /// Rate of Rise bounds
    pub ror: RorConfig,

    /// Presentation settings
    pub display: DisplayConfig,

    /// Multi-roast comparison settings
    pub comparison: ComparisonConfig,

    /// Session controller settings
    pub session: SessionConfig,

    /// Replay binary settings
    pub replay: ReplayConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TickerConfig {
    /// Milliseconds between ticks
    pub period_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RorConfig {
    /// Lower bound in °F/min
    pub min_f_per_min: f64,

    /// Upper bound in °F/min
    pub max_f_per_min: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    pub unit: TemperatureUnit,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ComparisonConfig {
    /// Upper bound on grid rows per comparison
    pub max_points: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Elapsed seconds past which a resumed, unfinished roast is flagged
    pub resume_warning_secs: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayConfig {
    /// Event file to replay when no path is given on the command line
    pub path: Option<String>,

    /// Live ticks to run after the one-shot report; 0 disables the live run
    pub live_ticks: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of the human-readable format
    pub json: bool,
}

impl TimelineConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("ROASTLINE_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("ticker.period_ms", 1000)?
            .set_default("ror.min_f_per_min", RorBounds::FAHRENHEIT_MIN)?
            .set_default("ror.max_f_per_min", RorBounds::FAHRENHEIT_MAX)?
            .set_default("display.unit", "fahrenheit")?
            .set_default("comparison.max_points", 200)?
            .set_default("session.resume_warning_secs", 7200)?
            .set_default("replay.live_ticks", 0)?
            .set_default("logging.json", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (ROASTLINE_ prefix)
            .add_source(
                Environment::with_prefix("ROASTLINE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the runtime cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounds = RorBounds {
            min: self.ror.min_f_per_min,
            max: self.ror.max_f_per_min,
        };
        if !bounds.is_valid() {
            return Err(ConfigError::Message(format!(
                "ror bounds must be finite with min <= max, got {}..{}",
                self.ror.min_f_per_min, self.ror.max_f_per_min
            )));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.ticker.period_ms.max(1))
    }

    /// RoR bounds in °F/min; computations always run in Fahrenheit
    pub fn ror_bounds(&self) -> RorBounds {
        RorBounds::new(self.ror.min_f_per_min, self.ror.max_f_per_min)
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            ticker: TickerConfig { period_ms: 1000 },
            ror: RorConfig {
                min_f_per_min: RorBounds::FAHRENHEIT_MIN,
                max_f_per_min: RorBounds::FAHRENHEIT_MAX,
            },
            display: DisplayConfig {
                unit: TemperatureUnit::Fahrenheit,
            },
            comparison: ComparisonConfig { max_points: 200 },
            session: SessionConfig {
                resume_warning_secs: 7200,
            },
            replay: ReplayConfig {
                path: None,
                live_ticks: 0,
            },
            logging: LoggingConfig { json: false },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TimelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ror_bounds(), RorBounds::fahrenheit());
        assert_eq!(config.tick_period(), Duration::from_secs(1));
    }

    #[test]
    fn test_inverted_ror_bounds_rejected() {
        let mut config = TimelineConfig::default();
        config.ror.min_f_per_min = 100.0;
        assert!(matches!(config.validate(), Err(ConfigError::Message(_))));

        // Bounds handed to the engine are still usable
        let bounds = config.ror_bounds();
        assert!(bounds.is_valid());
        assert_eq!(bounds.clamp(90.0), 90.0);
    }

    #[test]
    fn test_non_finite_ror_bound_rejected() {
        let mut config = TimelineConfig::default();
        config.ror.max_f_per_min = f64::NAN;
        assert!(config.validate().is_err());
    }
}
