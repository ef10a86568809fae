//! # Authentication Failure Taxonomy
//!
//! The classified failure produced by the request guard. Transport-agnostic:
//! the API layer maps each variant to a status code, and the stable
//! [`AuthError::code`] string is what clients see.

use thiserror::Error;

/// Why a request could not be authenticated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthFailure {
    /// No token in the query string or the designated header.
    #[error("missing credential")]
    MissingCredential,

    /// Header present but without the expected scheme prefix.
    #[error("malformed credential")]
    MalformedCredential,

    /// Bad signature, corrupt structure, or unexpected algorithm.
    #[error("token verification failed")]
    VerificationFailed,

    /// Structurally valid but past its expiry.
    #[error("token expired")]
    Expired,
}

impl AuthFailure {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "MISSING_CREDENTIAL",
            Self::MalformedCredential => "MALFORMED_CREDENTIAL",
            Self::VerificationFailed => "INVALID_TOKEN",
            Self::Expired => "TOKEN_EXPIRED",
        }
    }
}

/// Classified failure of a single request's authentication.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthError {
    /// The caller's identity could not be established.
    #[error("unauthenticated: {0}")]
    Unauthenticated(AuthFailure),

    /// Identity is valid but no permission covers the requested path.
    #[error("permission denied: no permission allowed to resource")]
    PermissionDenied,
}

impl AuthError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(failure) => failure.code(),
            Self::PermissionDenied => "PERMISSION_DENIED",
        }
    }
}

impl From<AuthFailure> for AuthError {
    fn from(failure: AuthFailure) -> Self {
        Self::Unauthenticated(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let all = [
            AuthError::Unauthenticated(AuthFailure::MissingCredential),
            AuthError::Unauthenticated(AuthFailure::MalformedCredential),
            AuthError::Unauthenticated(AuthFailure::VerificationFailed),
            AuthError::Unauthenticated(AuthFailure::Expired),
            AuthError::PermissionDenied,
        ];
        let codes: std::collections::HashSet<_> = all.iter().map(AuthError::code).collect();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn display_messages() {
        let err = AuthError::from(AuthFailure::Expired);
        assert_eq!(err.to_string(), "unauthenticated: token expired");
        assert!(AuthError::PermissionDenied.to_string().contains("permission denied"));
    }
}
