use crate::application::APPLICATION_NAME;
use crate::http::model::HealthCheckResponse;
use axum::http::Uri;
use std::sync::LazyLock;

static HEALTH_CHECK_COUNTER: LazyLock<opentelemetry::metrics::Counter<u64>> = LazyLock::new(|| {
    opentelemetry::global::meter(APPLICATION_NAME)
        .u64_counter("http_server_health_check_requests")
        .with_description("Number of health check requests, by probed path")
        .build()
});

pub struct HealthCheckController;

impl HealthCheckController {
    /// Liveness only: Uptime Kuma being unreachable never makes the relay unhealthy.
    #[allow(clippy::unused_async)]
    #[tracing::instrument(level = "debug", skip(uri), fields(path = uri.path()))]
    pub async fn get_status_endpoint_handler(uri: Uri) -> HealthCheckResponse {
        tracing::debug!("Relay is alive");

        HEALTH_CHECK_COUNTER.add(
            1,
            &[opentelemetry::KeyValue::new("path", uri.path().to_string())],
        );

        HealthCheckResponse
    }
}
