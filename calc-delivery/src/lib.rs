//! Lead delivery over the Telegram Bot API, plus the session metadata
//! (country detection, time on site) that travels with each lead.

pub mod config;
pub mod country;
pub mod message;
pub mod telegram;

pub use config::{DeliveryConfig, DeliveryConfigError};
pub use message::{SessionMeta, compose, format_time_on_site};
pub use telegram::TelegramSender;
