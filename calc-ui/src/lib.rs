pub mod config;
pub mod console;
pub mod session;

pub use config::{AppConfig, ConfigError};
pub use console::ConsolePresenter;
pub use session::{DryRunDelivery, Session, SubmitOutcome};
