use crate::domain::status::PushStatus;
use crate::kuma::push_client::PushResponse;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;

// Health check and routing models

pub struct HealthCheckResponse;

impl IntoResponse for HealthCheckResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, "ok").into_response()
    }
}

pub struct NotFoundResponse;

impl IntoResponse for NotFoundResponse {
    fn into_response(self) -> Response {
        (StatusCode::NOT_FOUND, "not found").into_response()
    }
}

// Push models

/// Echoes what Uptime Kuma answered; anything but a 2xx becomes a 502.
pub struct PushResultResponse {
    status: PushStatus,
    response: PushResponse,
}

impl PushResultResponse {
    pub const fn new(status: PushStatus, response: PushResponse) -> Self {
        Self { status, response }
    }
}

impl IntoResponse for PushResultResponse {
    fn into_response(self) -> Response {
        let status_code = if self.response.is_success() {
            StatusCode::OK
        } else {
            StatusCode::BAD_GATEWAY
        };

        let body = format!(
            "pushed {} ({}): {}",
            self.status,
            self.response.status_code(),
            self.response.body()
        );

        (status_code, body).into_response()
    }
}

// Error models

/// Raised when Uptime Kuma could not be reached at all.
pub struct ErrorResponse(anyhow::Error);

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (StatusCode::BAD_GATEWAY, format!("kuma error: {:#}", self.0)).into_response()
    }
}

impl<E> From<E> for ErrorResponse
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(response: Response) -> String {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let response = NotFoundResponse.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await, "not found");
    }

    #[tokio::test]
    async fn test_error_response_keeps_the_error_chain() {
        let err = anyhow::anyhow!("connection refused").context("error sending request");
        let response = ErrorResponse::from(err).into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_of(response).await,
            "kuma error: error sending request: connection refused"
        );
    }
}
