//! # Cryptographic Error Types
//!
//! Structured errors for key loading and token operations in `hilo-crypto`.
//!
//! [`KeyError`] is fatal at startup. [`TokenError::VerificationFailed`]
//! deliberately renders as a single generic message; the inner
//! [`VerificationFailure`] is there for operator logs only.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate the signing key pair.
#[derive(Error, Debug)]
pub enum KeyError {
    /// Neither an inline PEM nor a key file was configured.
    #[error("no signing key configured")]
    NotConfigured,

    /// The key file could not be read.
    #[error("failed to read signing key from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PEM text is not a P-256 private key in PKCS#8 or SEC1 form.
    #[error("invalid ES256 private key: {0}")]
    InvalidPem(String),

    /// Encoding the key for export or for the signer failed.
    #[error("failed to encode ES256 key: {0}")]
    Encoding(String),

    /// The derived public key did not verify a signature made by the private key.
    #[error("signing key self-check failed: {0}")]
    SelfCheck(String),
}

/// Internal reason a token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationFailure {
    /// Not three base64url segments, or header/payload not valid JSON.
    Malformed,
    /// Header names an algorithm other than ES256 (including `none`).
    AlgorithmMismatch,
    /// Signature does not match the header and payload.
    SignatureInvalid,
}

impl VerificationFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::AlgorithmMismatch => "algorithm_mismatch",
            Self::SignatureInvalid => "signature_invalid",
        }
    }
}

impl std::fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from signing, verifying, or refreshing a token.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The claims could not be serialized or signed.
    #[error("failed to sign token: {0}")]
    Signing(String),

    /// The token is unusable. Not retryable without a new token.
    #[error("token verification failed")]
    VerificationFailed(VerificationFailure),
}

impl TokenError {
    /// The internal verification reason, if this is a verification failure.
    pub fn verification_failure(&self) -> Option<VerificationFailure> {
        match self {
            Self::VerificationFailed(reason) => Some(*reason),
            Self::Signing(_) => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        let reason = match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidEcdsaKey | ErrorKind::Crypto(_) => {
                VerificationFailure::SignatureInvalid
            }
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                VerificationFailure::AlgorithmMismatch
            }
            _ => VerificationFailure::Malformed,
        };
        Self::VerificationFailed(reason)
    }
}
