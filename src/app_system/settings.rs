use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment};
use serde::Deserialize;
use thiserror::Error;

use crate::pricing::DEFAULT_VAT_RATE;

const ENV_PREFIX: &str = "DELIVERY";
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] ConfigError),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Runtime settings. Defaults can be overridden with `DELIVERY__<FIELD>`
/// environment variables, e.g. `DELIVERY__POINT_OF_SALE=3`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Mailbox size of every actor.
    pub channel_capacity: usize,
    /// Point of sale printed in invoice numbers.
    pub point_of_sale: u32,
    pub vat_rate_percent: u32,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            channel_capacity: 32,
            point_of_sale: 1,
            vat_rate_percent: DEFAULT_VAT_RATE,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Loads defaults overlaid with the environment, then validates.
    pub fn load() -> Result<Self, SettingsError> {
        let builder = Self::defaults()?.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
        Self::from_builder(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = Settings::default();
        Config::builder()
            .set_default("channel_capacity", defaults.channel_capacity as i64)?
            .set_default("point_of_sale", i64::from(defaults.point_of_sale))?
            .set_default("vat_rate_percent", i64::from(defaults.vat_rate_percent))?
            .set_default("log_level", defaults.log_level)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.channel_capacity == 0 {
            return Err(SettingsError::Invalid("channel_capacity must be at least 1".to_string()));
        }
        if self.point_of_sale == 0 || self.point_of_sale > 9999 {
            return Err(SettingsError::Invalid(format!(
                "point_of_sale must be between 1 and 9999, got {}",
                self.point_of_sale
            )));
        }
        if self.vat_rate_percent > 100 {
            return Err(SettingsError::Invalid(format!(
                "vat_rate_percent must not exceed 100, got {}",
                self.vat_rate_percent
            )));
        }
        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(SettingsError::Invalid(format!("unknown log_level '{}'", self.log_level)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize() {
        let settings = Settings::from_builder(Settings::defaults().unwrap()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.vat_rate_percent, 21);
    }

    #[test]
    fn test_overrides_apply() {
        let builder = Settings::defaults()
            .unwrap()
            .set_override("point_of_sale", 3)
            .unwrap()
            .set_override("log_level", "debug")
            .unwrap();
        let settings = Settings::from_builder(builder).unwrap();
        assert_eq!(settings.point_of_sale, 3);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let zero_capacity = Settings { channel_capacity: 0, ..Settings::default() };
        assert!(matches!(zero_capacity.validate(), Err(SettingsError::Invalid(_))));

        let pos = Settings { point_of_sale: 10_000, ..Settings::default() };
        assert!(pos.validate().is_err());

        let level = Settings { log_level: "verbose".to_string(), ..Settings::default() };
        assert!(level.validate().is_err());
    }
}
