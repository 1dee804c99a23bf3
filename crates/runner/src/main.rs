mod cli;
mod config;
mod error;

use std::sync::Arc;

use auth::ApiCredentials;
use clap::Parser;
use coinbase_rest::CoinbaseRestClient;
use order_runner::{
    DryRunGateway, LogNotifier, Notifier, OrderGateway, OrderRunner, OrderRunnerConfig,
    ReceiptWriter,
};
use tracing::{error, info, warn};

use crate::cli::Cli;
use crate::config::{Config, API_URL_VAR, ORDER_FORM_VAR};
use crate::error::RunError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if cli.json_logs {
        common::init_json_logging();
    } else {
        common::init_logging();
    }

    info!("Running Cumulus");

    if let Err(e) = run(cli).await {
        error!(error = %e, "Fatal error");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), RunError> {
    let environment = cli.environment();
    let order_form_override = std::env::var(ORDER_FORM_VAR).ok();
    let api_url_override = std::env::var(API_URL_VAR).ok();

    let config = Config::load(&cli.config, environment, order_form_override.as_deref())?
        .with_api_url_fallback(api_url_override.as_deref())?;

    info!(
        environment = %config.environment,
        config = %cli.config.display(),
        orders = config.orders.len(),
        dry_run = cli.dry_run,
        "Configuration loaded"
    );

    if environment.is_production() && !cli.dry_run {
        warn!("Production environment: orders spend real money");
    }

    let gateway: Arc<dyn OrderGateway> = if cli.dry_run {
        Arc::new(DryRunGateway::new())
    } else {
        let credentials = match config.credentials {
            Some(credentials) => credentials,
            None => ApiCredentials::from_env()?,
        };
        let client = match config.api_url.as_deref() {
            Some(url) => {
                info!(api_url = %url, "Using API URL override");
                CoinbaseRestClient::with_base_url(credentials, environment, url)?
            }
            None => CoinbaseRestClient::new(credentials, environment)?,
        };
        Arc::new(client)
    };

    let runner = OrderRunner::new(
        gateway,
        OrderRunnerConfig {
            retry: config.retry,
            refresh_placed: cli.refresh,
        },
    );

    let mut notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(LogNotifier)];
    if let Some(path) = cli.receipt {
        notifiers.push(Box::new(ReceiptWriter::new(path)));
    }

    let report = runner.run_and_notify(&config.orders, &notifiers).await;

    if report.all_placed() {
        info!(placed = report.placed_count(), "Cumulus finished");
    } else {
        warn!(
            placed = report.placed_count(),
            failed = report.failed_count(),
            "Cumulus finished with failed orders"
        );
    }

    Ok(())
}
