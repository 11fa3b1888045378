use crate::application::config::RelayConfig;
use crate::application::context::create_application_state;
use crate::application::context::start_application;
use crate::application::opentelemetry::OpentelemetryHandler;
use anyhow::Result;
mod application;
mod domain;
mod http;
mod kuma;

#[tokio::main]
async fn main() -> Result<()> {
    // Read the configuration first so a missing token fails before anything starts
    let config = RelayConfig::from_env()?;

    // Initialize the OpenTelemetry stack
    let _opentelemetry_handler = OpentelemetryHandler::new()?;

    // Start the application
    let application_state = create_application_state(config)?;
    start_application(application_state).await?;

    Ok(())
}
