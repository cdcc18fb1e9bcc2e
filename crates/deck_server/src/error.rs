use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// An error surfaced to the browser as `{"error": "..."}` with a matching
/// status code.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::debug!("Not found: {}", message);
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::debug!("Bad request: {}", message);
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::debug!("Conflict: {}", message);
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!("Internal error: {}", message);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<deck_app::Error> for ApiError {
    fn from(error: deck_app::Error) -> Self {
        use deck_app::Error;

        let message = error.to_string();
        match error {
            Error::SessionNotFound(_) | Error::UnknownField(_) => Self::not_found(message),
            Error::Domain(deck_domain::Error::SessionId(_)) => Self::not_found(message),
            Error::TurnInFlight => Self::conflict(message),
            Error::EmptyMessage => Self::bad_request(message),
            _ => Self::internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub type ApiResult<A> = std::result::Result<A, ApiError>;
