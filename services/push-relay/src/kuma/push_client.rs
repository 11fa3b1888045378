use crate::application::APPLICATION_NAME;
use crate::application::config::RelayConfig;
use crate::domain::message::decode_text;
use crate::domain::status::PushStatus;
use crate::kuma::opentelemetry::HttpHeaderContextInjector;
use crate::kuma::opentelemetry::should_propagate_trace_context;
use anyhow::Result;
use std::sync::LazyLock;
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

static PUSH_RESULT_COUNTER: LazyLock<opentelemetry::metrics::Counter<u64>> = LazyLock::new(|| {
    opentelemetry::global::meter(APPLICATION_NAME)
        .u64_counter("kuma_push_results")
        .with_description("Number of pushes sent to Uptime Kuma, by outcome")
        .build()
});

#[derive(serde::Serialize)]
struct PushQuery<'a> {
    status: PushStatus,
    msg: &'a str,
    ping: &'static str,
}

/// What Uptime Kuma answered to a push.
#[derive(Debug)]
pub struct PushResponse {
    status_code: u16,
    body: String,
}

impl PushResponse {
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.status_code, 200..=299)
    }
}

/// Forwards statuses to the Uptime Kuma push endpoint of a single monitor.
pub struct PushClient {
    client: reqwest::Client,
    push_url: String,
}

impl PushClient {
    const OUTCOME_SUCCESS: &str = "success";
    const OUTCOME_REJECTED: &str = "rejected";
    const OUTCOME_TRANSPORT_ERROR: &str = "transport_error";

    pub fn new(config: &RelayConfig) -> Result<Self> {
        tracing::debug!("Initializing the Kuma push client");

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            push_url: format!("{}{}", config.base_url(), config.push_token()),
        })
    }

    /// Sends a single `GET <base_url><token>?status=..&msg=..&ping=` request.
    ///
    /// Any downstream HTTP answer is returned as is, whatever its status code.
    /// Only transport failures (timeout, refused connection, broken response)
    /// are reported as errors. The URL is stripped from those errors since it
    /// carries the push token.
    #[tracing::instrument(skip(self, message))]
    pub async fn push(&self, status: PushStatus, message: &str) -> Result<PushResponse> {
        let query = PushQuery {
            status,
            msg: message,
            ping: "",
        };

        let mut request = self.client.get(&self.push_url).query(&query);
        if should_propagate_trace_context() {
            let mut context_injector = HttpHeaderContextInjector::default();
            let opentelemetry_context = tracing::Span::current().context();
            opentelemetry::global::get_text_map_propagator(|propagator| {
                propagator.inject_context(&opentelemetry_context, &mut context_injector);
            });

            request = request.headers(context_injector.into_headers());
        }

        match Self::send(request).await {
            Ok(response) => {
                let outcome = if response.is_success() {
                    Self::OUTCOME_SUCCESS
                } else {
                    Self::OUTCOME_REJECTED
                };
                tracing::debug!(
                    "Uptime Kuma answered {} to the {status} push",
                    response.status_code
                );

                Self::record_outcome(status, outcome);

                Ok(response)
            }
            Err(err) => {
                tracing::debug!("Failed to push {status} to Uptime Kuma: {err:#}");

                Self::record_outcome(status, Self::OUTCOME_TRANSPORT_ERROR);

                Err(err)
            }
        }
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<PushResponse> {
        let response = request.send().await.map_err(reqwest::Error::without_url)?;

        let status_code = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)?;

        Ok(PushResponse {
            status_code,
            body: decode_text(&body),
        })
    }

    fn record_outcome(status: PushStatus, outcome: &'static str) {
        PUSH_RESULT_COUNTER.add(
            1,
            &[
                opentelemetry::KeyValue::new("status", status.as_str()),
                opentelemetry::KeyValue::new("outcome", outcome),
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;
    use wiremock::matchers::method;
    use wiremock::matchers::path;
    use wiremock::matchers::query_param;

    fn client_for(server: &MockServer, timeout: &str) -> PushClient {
        let config = RelayConfig::for_tests(&format!("{}/api/push", server.uri()), timeout);

        PushClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_push_sends_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/push/abc123"))
            .and(query_param("status", "up"))
            .and(query_param("msg", "watchtower_ok"))
            .and(query_param("ping", ""))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server, "5")
            .push(PushStatus::Up, "watchtower_ok")
            .await
            .unwrap();

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.body(), r#"{"ok":true}"#);
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_push_encodes_reserved_characters() {
        let message = "a&b=c d+e%f#g?h é";

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/push/abc123"))
            .and(query_param("status", "down"))
            .and(query_param("msg", message))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server, "5")
            .push(PushStatus::Down, message)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let query = requests[0].url.query().unwrap_or_default();

        assert!(query.starts_with("status=down&msg="));
        assert!(query.ends_with("&ping="));
        assert!(!query.contains("a&b"));
    }

    #[tokio::test]
    async fn test_push_returns_non_success_answers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Monitor not found"))
            .mount(&server)
            .await;

        let response = client_for(&server, "5")
            .push(PushStatus::Down, "db down")
            .await
            .unwrap();

        assert_eq!(response.status_code(), 404);
        assert_eq!(response.body(), "Monitor not found");
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_push_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let err = client_for(&server, "0.2")
            .push(PushStatus::Up, "slow")
            .await
            .unwrap_err();

        let reqwest_err = err.downcast_ref::<reqwest::Error>().unwrap();
        assert!(reqwest_err.is_timeout());
        assert!(!format!("{err:#}").contains("abc123"));
    }
}
