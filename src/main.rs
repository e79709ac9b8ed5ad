mod api_client;
mod config;
mod error;
mod homework;
mod notifier;
mod poller;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use api_client::ApiClient;
use clap::Parser;
use config::{Config, PollSettings};
use notifier::TelegramNotifier;
use poller::Poller;
use std::path::PathBuf;
use std::time::Duration;
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "homework-status-bot",
    version,
    about = "Forwards homework review status changes to a Telegram chat"
)]
struct Cli {
    /// Seconds between polls.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// Upper bound in seconds for the delay after repeated failures.
    #[arg(long, default_value_t = 600)]
    max_backoff: u64,

    /// Timeout in seconds for a single API request.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    request_timeout: u64,

    /// Directory for the rotating log files.
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Do not log to standard output.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(self.interval),
            max_backoff: Duration::from_secs(self.max_backoff),
            request_timeout: Duration::from_secs(self.request_timeout),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env before logging so RUST_LOG can live there too
    dotenvy::dotenv().ok();
    let _guard = init_logging(&cli)?;

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration is incomplete: {}", e);
            return Err(e.into());
        }
    };

    info!("Starting homework status bot...");
    info!("Endpoint: {}", config.endpoint);

    let settings = cli.poll_settings();
    let api_client = ApiClient::new(
        config.endpoint.clone(),
        config.practicum_token.clone(),
        settings.request_timeout,
    )?;
    let bot = Bot::new(&config.telegram_token);
    let notifier = TelegramNotifier::new(bot, &config.telegram_chat_id);

    let mut poller = Poller::new(
        api_client,
        notifier,
        settings,
        chrono::Utc::now().timestamp(),
    );
    poller.run_until(shutdown_signal()).await;

    info!("Bot stopped, last cursor {}", poller.cursor());
    Ok(())
}

fn init_logging(cli: &Cli) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&cli.log_dir)
        .with_context(|| format!("Failed to create log directory {}", cli.log_dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("homework_bot")
        .filename_suffix("log")
        .max_log_files(5)
        .build(&cli.log_dir)
        .context("Failed to create log file appender")?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let stdout_layer = (!cli.quiet).then(|| fmt::layer());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(stdout_layer)
        .init();

    Ok(guard)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
