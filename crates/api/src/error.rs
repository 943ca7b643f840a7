//! API error types and their HTTP mapping

use std::io;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use daybook_core::Error as CoreError;
use serde_json::json;
use tracing::error;

/// API result type
pub type Result<T> = std::result::Result<T, Error>;

/// API errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Core(CoreError::Validation(_) | CoreError::UserExists) => StatusCode::BAD_REQUEST,
            Error::Core(CoreError::InvalidCredentials | CoreError::Unauthenticated) => {
                StatusCode::UNAUTHORIZED
            }
            Error::Core(CoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Core(_) | Error::Io(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show a client. Internal details stay in the logs.
    fn client_message(&self) -> String {
        match self {
            Error::Core(CoreError::Validation(msg)) => msg.clone(),
            Error::Core(e) if !e.is_internal() => e.to_string(),
            Error::BadRequest(msg) => msg.clone(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::Core(CoreError::validation("x")), StatusCode::BAD_REQUEST),
            (Error::Core(CoreError::UserExists), StatusCode::BAD_REQUEST),
            (Error::Core(CoreError::InvalidCredentials), StatusCode::UNAUTHORIZED),
            (Error::Core(CoreError::Unauthenticated), StatusCode::UNAUTHORIZED),
            (Error::Core(CoreError::NotFound("Goal")), StatusCode::NOT_FOUND),
            (
                Error::Core(CoreError::PasswordHash("bad".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err}");
        }
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = Error::Core(CoreError::PasswordHash("salt: invalid length".into()));
        assert_eq!(err.client_message(), "Internal server error");
        assert_eq!(
            Error::Io(io::Error::other("disk on fire")).client_message(),
            "Internal server error"
        );
        assert_eq!(
            Error::Core(CoreError::NotFound("Habit")).client_message(),
            "Habit not found"
        );
    }
}
