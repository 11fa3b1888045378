use crate::application::config::RelayConfig;
use crate::http::http_server::HttpServer;
use crate::kuma::push_client::PushClient;
use anyhow::Result;
use std::sync::Arc;

/// Everything a request needs, built once at startup and only ever read.
pub struct ApplicationState {
    config: RelayConfig,
    push_client: PushClient,
}

impl ApplicationState {
    pub fn new(config: RelayConfig) -> Result<Self> {
        let push_client = PushClient::new(&config)?;

        Ok(Self {
            config,
            push_client,
        })
    }

    pub const fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub const fn push_client(&self) -> &PushClient {
        &self.push_client
    }
}

pub type SharedApplicationState = Arc<ApplicationState>;

pub fn create_application_state(config: RelayConfig) -> Result<SharedApplicationState> {
    tracing::debug!("Creating the application state with {config:?}");

    Ok(Arc::new(ApplicationState::new(config)?))
}

pub async fn start_application(application_state: SharedApplicationState) -> Result<()> {
    let http_server = HttpServer::new(
        application_state.config().port(),
        Arc::clone(&application_state),
    );

    // Start the different components of the application
    for handle in http_server.start() {
        handle.await??;
    }

    Ok(())
}
