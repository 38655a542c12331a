//! Delivery configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Errors produced by [`DeliveryConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryConfigError {
    #[error("bot token must not be empty")]
    EmptyBotToken,

    #[error("at least one recipient chat id is required")]
    NoRecipients,

    #[error("recipient chat id must not be blank")]
    BlankRecipient,

    #[error("api base must be an http(s) url, got {0:?}")]
    InvalidApiBase(String),
}

/// Settings for the Telegram lead channel.
///
/// The bot token is a credential and is always injected through
/// configuration, never compiled in. Every chat id in `chat_ids` receives
/// each lead, and every one of them must acknowledge it for the delivery
/// to count as successful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    pub bot_token: String,
    pub chat_ids: Vec<String>,
    /// Override for tests and proxies.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl DeliveryConfig {
    /// Checks the configuration before a sender is built from it.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryConfigError`] when the token is empty, no
    /// recipients are configured, a recipient is blank, or the API base
    /// is not an http(s) URL.
    pub fn validate(&self) -> Result<(), DeliveryConfigError> {
        if self.bot_token.trim().is_empty() {
            return Err(DeliveryConfigError::EmptyBotToken);
        }
        if self.chat_ids.is_empty() {
            return Err(DeliveryConfigError::NoRecipients);
        }
        if self.chat_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(DeliveryConfigError::BlankRecipient);
        }
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(DeliveryConfigError::InvalidApiBase(self.api_base.clone()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config() -> DeliveryConfig {
        DeliveryConfig {
            bot_token: "123456:abcdef".to_string(),
            chat_ids: vec!["-100111".to_string(), "-100222".to_string()],
            api_base: default_api_base(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn validate_accepts_complete_config() {
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_empty_token() {
        let mut c = config();
        c.bot_token = "   ".to_string();

        assert_eq!(c.validate(), Err(DeliveryConfigError::EmptyBotToken));
    }

    #[test]
    fn validate_rejects_missing_and_blank_recipients() {
        let mut c = config();
        c.chat_ids.clear();
        assert_eq!(c.validate(), Err(DeliveryConfigError::NoRecipients));

        c.chat_ids = vec!["-100111".to_string(), "".to_string()];
        assert_eq!(c.validate(), Err(DeliveryConfigError::BlankRecipient));
    }

    #[test]
    fn validate_rejects_non_http_api_base() {
        let mut c = config();
        c.api_base = "api.telegram.org".to_string();

        assert_eq!(
            c.validate(),
            Err(DeliveryConfigError::InvalidApiBase(
                "api.telegram.org".to_string()
            ))
        );
    }

    #[test]
    fn defaults_apply_when_fields_are_omitted() {
        let c: DeliveryConfig = serde_json::from_str(
            r#"{ "bot_token": "123456:abcdef", "chat_ids": ["-100111"] }"#,
        )
        .unwrap();

        assert_eq!(c.api_base, "https://api.telegram.org");
        assert_eq!(c.timeout_secs, 10);
    }
}
