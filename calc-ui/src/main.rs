use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use calc_core::WizardEngine;
use calc_delivery::TelegramSender;
use calc_ui::{AppConfig, ConsolePresenter, DryRunDelivery, Session};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Profitability calculator with lead capture.
///
/// Walks the seven-step estimate wizard on the terminal and delivers the
/// captured contact details to the configured Telegram chats.
#[derive(Debug, Parser)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "profitcalc.toml")]
    config: PathBuf,

    /// Log the lead instead of sending it; no delivery config needed.
    #[arg(long)]
    dry_run: bool,
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    // --dry-run works without any config file on disk
    let config = if cli.dry_run && !cli.config.exists() {
        AppConfig::default()
    } else {
        AppConfig::load(&cli.config)?
    };

    let engine = WizardEngine::with_default_flow(config.pricing.clone())?;
    let presenter = ConsolePresenter::new(std::io::stdout());
    let input = BufReader::new(std::io::stdin());

    if cli.dry_run {
        info!("dry run: leads will be logged, not sent");
        let mut session = Session::new(engine, presenter, DryRunDelivery);
        session.run(input).await?;
    } else {
        let mut sender = TelegramSender::new(config.delivery()?.clone())?;
        debug!("resolving session country");
        sender.refresh_country().await;
        let mut session = Session::new(engine, presenter, sender);
        session.run(input).await?;
    }

    Ok(())
}
