use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use reviewscrape::{config::Config, info_time, process::process_books};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let start_time = Local::now();
    let config = Config::parse();
    init_tracing(config.verbose);

    info!(
        concurrency = config.concurrency,
        max_reviews = config.max_reviews,
        language = %config.language,
        output = ?config.output,
        "Starting review harvest"
    );

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    warn!("Interrupt received, finishing in-flight books");
                    cancel.cancel();
                }
                Err(e) => error!(error = %e, "Unable to listen for shutdown signal"),
            }
        }
    });

    match process_books(&config, cancel).await {
        Ok(_) => {
            info_time!(start_time, "Full program time:");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
