use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::types::CommandResponse;

/// Authentication errors for the middleware layer.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No valid credential cookie, or the token failed re-validation.
    #[error("Not authenticated")]
    Unauthenticated,

    /// CSRF state missing, mismatched, or already consumed (callback replay).
    #[error("Invalid login state")]
    InvalidState,

    /// The chosen act does not belong to the authenticated user.
    #[error("Act does not belong to the current user")]
    ActNotOwned,

    /// User/act store operation failed.
    #[error("Store error: {0}")]
    Store(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }
            Self::InvalidState => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            Self::ActNotOwned => (
                StatusCode::FORBIDDEN,
                Json(CommandResponse::failure(self.to_string())),
            )
                .into_response(),
            Self::Store(_) | Self::Config(_) => {
                tracing::error!(error = %self, "Auth internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            AuthError::Unauthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidState.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::ActNotOwned.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::Store("db down".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
