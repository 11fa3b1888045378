use crate::application::context::SharedApplicationState;
use crate::http::fallback_controller::FallbackController;
use crate::http::health_check_controller::HealthCheckController;
use crate::http::push_controller::PushController;
use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::routing::post;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::DefaultMakeSpan;
use tower_http::trace::DefaultOnResponse;
use tower_http::trace::TraceLayer;

pub struct HttpServer {
    port: u16,
    application_state: SharedApplicationState,
}

impl HttpServer {
    const DEFAULT_LISTENER_ADDR: [u8; 4] = [0, 0, 0, 0];
    const BODY_LIMIT: DefaultBodyLimit = DefaultBodyLimit::max(1024 * 1024); // 1MB

    pub fn new(port: u16, application_state: SharedApplicationState) -> Self {
        tracing::debug!("Initializing the HTTP server");

        Self {
            port,
            application_state,
        }
    }

    pub fn start(&self) -> Vec<JoinHandle<Result<()>>> {
        tracing::info!("Starting the HTTP server on port {}", self.port);

        let port = self.port;
        let application_state = Arc::clone(&self.application_state);

        vec![tokio::spawn(async move {
            Self::worker_axum(port, application_state).await
        })]
    }

    pub fn router(application_state: SharedApplicationState) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().include_headers(true))
            .on_response(DefaultOnResponse::new().level(tracing::Level::INFO));

        // Construct the routes, wrong methods (HEAD included) fall back to a 404
        Router::new()
            .route(
                "/",
                get(HealthCheckController::get_status_endpoint_handler)
                    .head(FallbackController::fallback_endpoint_handler)
                    .fallback(FallbackController::fallback_endpoint_handler),
            )
            .route(
                "/health",
                get(HealthCheckController::get_status_endpoint_handler)
                    .head(FallbackController::fallback_endpoint_handler)
                    .fallback(FallbackController::fallback_endpoint_handler),
            )
            .route(
                "/up",
                post(PushController::push_up_endpoint_handler)
                    .fallback(FallbackController::fallback_endpoint_handler),
            )
            .route(
                "/down",
                post(PushController::push_down_endpoint_handler)
                    .fallback(FallbackController::fallback_endpoint_handler),
            )
            .fallback(FallbackController::fallback_endpoint_handler)
            .layer(Self::BODY_LIMIT)
            .layer(trace_layer)
            .with_state(application_state)
    }

    async fn worker_axum(port: u16, application_state: SharedApplicationState) -> Result<()> {
        let router = Self::router(application_state);

        let addr = SocketAddr::from((Self::DEFAULT_LISTENER_ADDR, port));
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Starting HTTP Server on {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(Self::shutdown_signal())
            .await?;

        tracing::info!("HTTP Server stopped");

        Ok(())
    }

    async fn shutdown_signal() {
        let ctrl_c = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {err}");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(err) => {
                    tracing::error!("Failed to listen for SIGTERM: {err}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {},
            () = terminate => {},
        }

        tracing::info!("Shutdown signal received");
    }
}
