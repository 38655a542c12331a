//! Telegram lead channel.
//!
//! Posts each captured lead to the Bot API `sendMessage` endpoint for
//! every configured chat, in parallel. Delivery counts as successful only
//! when every recipient acknowledges with `ok: true`; a single failed or
//! unacknowledged send fails the whole submission so the visitor is told
//! to retry.

use std::time::Instant;

use async_trait::async_trait;
use calc_core::models::{Lead, PricingContext};
use calc_core::ports::{DeliveryFailure, LeadDelivery};
use chrono::Local;
use futures::future;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{DeliveryConfig, DeliveryConfigError};
use crate::country;
use crate::message::{self, SessionMeta};

impl From<DeliveryConfigError> for DeliveryFailure {
    fn from(err: DeliveryConfigError) -> Self {
        DeliveryFailure::Configuration(err.to_string())
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Deserialize)]
struct SendMessageAck {
    ok: bool,
}

/// [`LeadDelivery`] implementation backed by the Telegram Bot API.
#[derive(Debug)]
pub struct TelegramSender {
    client: Client,
    config: DeliveryConfig,
    /// Session start, for the time-on-site line.
    started: Instant,
    country: String,
}

impl TelegramSender {
    /// Validates the configuration and builds the HTTP client.
    ///
    /// The detected country starts out unknown; call
    /// [`refresh_country`](Self::refresh_country) once at session start to
    /// fill it in.
    pub fn new(config: DeliveryConfig) -> Result<Self, DeliveryFailure> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DeliveryFailure::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            config,
            started: Instant::now(),
            country: "Unknown".to_string(),
        })
    }

    /// Runs best-effort country detection and caches the result for every
    /// subsequent submission.
    pub async fn refresh_country(&mut self) {
        self.country = country::detect(&self.client).await;
        debug!(country = %self.country, "session country resolved");
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_base, self.config.bot_token
        )
    }

    async fn send_to_chat(&self, chat_id: &str, text: &str) -> Result<(), DeliveryFailure> {
        let ack: SendMessageAck = self
            .client
            .post(self.send_message_url())
            .json(&SendMessageRequest {
                chat_id,
                text,
                parse_mode: "Markdown",
            })
            .send()
            .await
            .map_err(|e| DeliveryFailure::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| DeliveryFailure::Transport(e.to_string()))?;

        if ack.ok {
            Ok(())
        } else {
            Err(DeliveryFailure::Unacknowledged)
        }
    }
}

#[async_trait]
impl LeadDelivery for TelegramSender {
    async fn submit_lead(
        &self,
        lead: &Lead,
        context: Option<&PricingContext>,
    ) -> Result<(), DeliveryFailure> {
        let meta = SessionMeta {
            time_on_site: self.started.elapsed(),
            country: self.country.clone(),
            submitted_at: Local::now(),
        };
        let text = message::compose(lead, context, &meta);

        let sends = self
            .config
            .chat_ids
            .iter()
            .map(|chat_id| self.send_to_chat(chat_id, &text));
        let results = future::join_all(sends).await;

        let mut failure = None;
        for (chat_id, result) in self.config.chat_ids.iter().zip(results) {
            if let Err(err) = result {
                warn!(chat_id = %chat_id, error = %err, "lead send failed");
                failure.get_or_insert(err);
            }
        }

        match failure {
            Some(err) => Err(err),
            None => {
                info!(
                    recipients = self.config.chat_ids.len(),
                    "lead delivered to all recipients"
                );
                Ok(())
            }
        }
    }
}
