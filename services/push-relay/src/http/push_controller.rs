use crate::application::APPLICATION_NAME;
use crate::application::context::SharedApplicationState;
use crate::domain::message::ExtractedMessage;
use crate::domain::status::PushStatus;
use crate::http::model::ErrorResponse;
use crate::http::model::PushResultResponse;
use axum::body::Bytes;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::Response;
use std::sync::LazyLock;

static PUSH_COUNTER: LazyLock<opentelemetry::metrics::Counter<u64>> = LazyLock::new(|| {
    opentelemetry::global::meter(APPLICATION_NAME)
        .u64_counter("http_server_push_requests")
        .with_description("Number of push requests")
        .build()
});

pub struct PushController;

impl PushController {
    #[tracing::instrument(skip(state, request))]
    pub async fn push_up_endpoint_handler(
        State(state): State<SharedApplicationState>,
        request: Request,
    ) -> Response {
        Self::relay(PushStatus::Up, &state, request).await
    }

    #[tracing::instrument(skip(state, request))]
    pub async fn push_down_endpoint_handler(
        State(state): State<SharedApplicationState>,
        request: Request,
    ) -> Response {
        Self::relay(PushStatus::Down, &state, request).await
    }

    async fn relay(
        status: PushStatus,
        state: &SharedApplicationState,
        request: Request,
    ) -> Response {
        tracing::info!("Relaying {status} notification");

        PUSH_COUNTER.add(1, &[opentelemetry::KeyValue::new("status", status.as_str())]);

        let body = match Self::read_declared_body(request).await {
            Ok(body) => body,
            Err(rejection) => {
                tracing::warn!("Failed to read the {status} notification body: {rejection}");

                return rejection.into_response();
            }
        };

        let extracted =
            ExtractedMessage::extract(&body, state.config().default_message(status));
        tracing::debug!("Message taken from {}", extracted.source());

        match state
            .push_client()
            .push(status, &extracted.into_message())
            .await
        {
            Ok(response) => {
                if !response.is_success() {
                    tracing::warn!(
                        "Uptime Kuma rejected the {status} push with status {}",
                        response.status_code()
                    );
                }

                PushResultResponse::new(status, response).into_response()
            }
            Err(err) => ErrorResponse::from(err).into_response(),
        }
    }

    // Only a declared length gives the request a body, anything else is never read
    async fn read_declared_body(request: Request) -> Result<Bytes, BytesRejection> {
        if !request.headers().contains_key(header::CONTENT_LENGTH) {
            return Ok(Bytes::new());
        }

        <Bytes as FromRequest<()>>::from_request(request, &()).await
    }
}
