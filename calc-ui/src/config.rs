//! Application configuration.
//!
//! Loaded from a TOML file at startup. Pricing falls back to the built-in
//! rates when omitted; the delivery section is required unless the
//! calculator runs with `--dry-run`, because the bot token is a
//! credential that is only ever injected, never compiled in.

use std::path::Path;

use calc_core::pricing::PricingConfig;
use calc_delivery::DeliveryConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("config has no [delivery] section; add one or pass --dry-run")]
    MissingDelivery,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pricing: PricingConfig,
    pub delivery: Option<DeliveryConfig>,
}

impl AppConfig {
    /// Reads and parses the config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// The delivery section, required for live submissions.
    pub fn delivery(&self) -> Result<&DeliveryConfig, ConfigError> {
        self.delivery.as_ref().ok_or(ConfigError::MissingDelivery)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn full_config_parses() {
        let config: AppConfig = toml::from_str(
            r#"
            [pricing]
            standard_rate = "3200"
            exclusive_rate = "3700"
            fallback_rate = "2500"
            marketing_optout_factor = "0.7"

            [delivery]
            bot_token = "123456:abcdef"
            chat_ids = ["-100111", "-100222"]
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.standard_rate, dec!(3200));
        let delivery = config.delivery().unwrap();
        assert_eq!(delivery.chat_ids.len(), 2);
        assert_eq!(delivery.api_base, "https://api.telegram.org");
    }

    #[test]
    fn pricing_section_is_optional() {
        let config: AppConfig = toml::from_str(
            r#"
            [delivery]
            bot_token = "123456:abcdef"
            chat_ids = ["-100111"]
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing, PricingConfig::default());
    }

    #[test]
    fn missing_delivery_section_is_reported_on_access() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert!(config.delivery.is_none());
        assert!(matches!(
            config.delivery().unwrap_err(),
            ConfigError::MissingDelivery
        ));
    }
}
