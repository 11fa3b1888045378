use crate::application::APPLICATION_NAME;
use crate::http::model::NotFoundResponse;
use axum::http::Method;
use axum::http::Uri;
use std::sync::LazyLock;

static FALLBACK_COUNTER: LazyLock<opentelemetry::metrics::Counter<u64>> = LazyLock::new(|| {
    opentelemetry::global::meter(APPLICATION_NAME)
        .u64_counter("http_server_fallback_requests")
        .with_description("Number of requests matching no relay route, by method")
        .build()
});

pub struct FallbackController;

impl FallbackController {
    /// Answers unknown paths as well as known paths hit with the wrong method.
    #[allow(clippy::unused_async)]
    #[tracing::instrument(skip(method, uri))]
    pub async fn fallback_endpoint_handler(method: Method, uri: Uri) -> NotFoundResponse {
        tracing::warn!("No relay route for {method} {}", uri.path());

        FALLBACK_COUNTER.add(
            1,
            &[opentelemetry::KeyValue::new("method", method.to_string())],
        );

        NotFoundResponse
    }
}
