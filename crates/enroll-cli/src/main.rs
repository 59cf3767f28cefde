//! Phone enrollment CLI - Main entry point.

mod config;
mod error;
mod ui;

use crate::config::Config;
use crate::error::AppResult;
use anyhow::Context;
use enrollment_form::EnrollmentForm;
use secrecy::ExposeSecret;
use softpoint_client::{EnrollmentSession, SoftpointClient};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.log.level);

    info!("Starting phone enrollment...");
    info!("Softpoint endpoint: {}", config.api.base_url);

    let client = SoftpointClient::new(
        config.api.api_key.expose_secret().as_str(),
        &config.api.base_url,
        config.api.corporate_id,
        config.api.timeout,
    )?;

    // Token and catalog are fetched together; nothing can submit
    // before both have resolved.
    let session = EnrollmentSession::establish(client).await?;
    info!("Session ready ({} countries)", session.catalog().len());

    let mut form = EnrollmentForm::new();
    form.load_catalog(session.catalog());

    ui::run(&session, &mut form).await?;

    session.clear();
    info!("Shutting down...");
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
