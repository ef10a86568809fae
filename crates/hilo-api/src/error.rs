//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! This is the single place where failures become HTTP responses.
//!
//! | Failure                               | Status | Code                 |
//! |---------------------------------------|--------|----------------------|
//! | missing credential                    | 401    | MISSING_CREDENTIAL   |
//! | malformed credential                  | 401    | MALFORMED_CREDENTIAL |
//! | verification failure                  | 401    | INVALID_TOKEN        |
//! | expired token                         | 401    | TOKEN_EXPIRED        |
//! | permission denied                     | 403    | PERMISSION_DENIED    |
//! | unparsable request                    | 400    | BAD_REQUEST          |
//! | no route                              | 404    | NOT_FOUND            |
//! | signing, key or guard fault           | 500    | INTERNAL_ERROR       |
//!
//! Internal error details are logged and never returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hilo_core::{AuthError, AuthFailure};
use hilo_crypto::{KeyError, TokenError};

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "TOKEN_EXPIRED", "NOT_FOUND").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body or argument could not be used (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No such route or resource (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Authentication (401) or authorization (403) failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Auth(err @ AuthError::Unauthenticated(_)) => {
                (StatusCode::UNAUTHORIZED, err.code())
            }
            Self::Auth(err @ AuthError::PermissionDenied) => (StatusCode::FORBIDDEN, err.code()),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::Auth(AuthError::Unauthenticated(failure)) => failure.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.client_message();

        // Log internal errors for operator visibility.
        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthFailure> for AppError {
    fn from(failure: AuthFailure) -> Self {
        Self::Auth(AuthError::Unauthenticated(failure))
    }
}

/// Verification failures are the caller's problem; signing failures are ours.
impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::VerificationFailed(reason) => {
                tracing::warn!(reason = %reason, "token verification failed");
                Self::from(AuthFailure::VerificationFailed)
            }
            TokenError::Signing(msg) => Self::Internal(format!("token signing failed: {msg}")),
        }
    }
}

impl From<KeyError> for AppError {
    fn from(err: KeyError) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hilo_crypto::VerificationFailure;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn classification_is_total() {
        let cases = [
            (AppError::from(AuthFailure::MissingCredential), 401, "MISSING_CREDENTIAL"),
            (AppError::from(AuthFailure::MalformedCredential), 401, "MALFORMED_CREDENTIAL"),
            (AppError::from(AuthFailure::VerificationFailed), 401, "INVALID_TOKEN"),
            (AppError::from(AuthFailure::Expired), 401, "TOKEN_EXPIRED"),
            (AppError::from(AuthError::PermissionDenied), 403, "PERMISSION_DENIED"),
            (AppError::BadRequest("x".into()), 400, "BAD_REQUEST"),
            (AppError::NotFound("x".into()), 404, "NOT_FOUND"),
            (AppError::Internal("x".into()), 500, "INTERNAL_ERROR"),
        ];
        for (err, status, code) in cases {
            let (actual_status, actual_code) = err.status_and_code();
            assert_eq!(actual_status.as_u16(), status, "{err:?}");
            assert_eq!(actual_code, code);
        }
    }

    #[test]
    fn token_errors_convert() {
        let err = AppError::from(TokenError::VerificationFailed(
            VerificationFailure::SignatureInvalid,
        ));
        assert_eq!(err.status_and_code().1, "INVALID_TOKEN");

        let err = AppError::from(TokenError::Signing("ecdsa".into()));
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::from(KeyError::NotConfigured);
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn internal_message_is_hidden() {
        let (status, body) = body_json(AppError::Internal("key file /etc/secret.pem".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "An internal error occurred");
        assert!(body["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn auth_body_uses_stable_code_and_generic_message() {
        let (status, body) = body_json(AppError::from(AuthFailure::VerificationFailed)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
        assert_eq!(body["error"]["message"], "token verification failed");

        let (status, body) = body_json(AppError::from(AuthError::PermissionDenied)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("no permission allowed to resource"));
    }
}
