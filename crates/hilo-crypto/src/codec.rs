//! # Token Codec
//!
//! Compact JWS (`header.payload.signature`, base64url without padding)
//! signed with ES256 over [`Claims`].
//!
//! `verify` checks structure, algorithm and signature only. Expiry is a
//! separate decision (see [`hilo_core::check_expiry`]) so that an expired
//! token can still be decoded for refresh.
//!
//! The header algorithm is never trusted: only `ES256` is accepted, so
//! `none` and HMAC substitutions fail verification.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, Header, Validation};
use serde::{Deserialize, Serialize};

use hilo_core::Claims;

use crate::error::TokenError;
use crate::keys::SigningKeyPair;

/// A signed, self-contained token string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedToken(String);

impl SignedToken {
    /// Wrap a token string that has already passed verification.
    pub(crate) fn from_verified(token: &str) -> Self {
        Self(token.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SignedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SignedToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Signs and verifies tokens with the process key pair.
#[derive(Clone)]
pub struct TokenCodec {
    keys: Arc<SigningKeyPair>,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(keys: impl Into<Arc<SigningKeyPair>>) -> Self {
        let mut validation = Validation::new(Algorithm::ES256);
        // Expiry, audience and nbf are policy decisions made by callers.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            keys: keys.into(),
            validation,
        }
    }

    /// The key pair backing this codec.
    pub fn keys(&self) -> &SigningKeyPair {
        &self.keys
    }

    /// Sign `claims` into a compact token.
    pub fn sign(&self, claims: &Claims) -> Result<SignedToken, TokenError> {
        jsonwebtoken::encode(
            &Header::new(Algorithm::ES256),
            claims,
            self.keys.encoding_key(),
        )
        .map(SignedToken)
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify the signature of `token` and decode its claims.
    ///
    /// Does not check expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data =
            jsonwebtoken::decode::<Claims>(token, self.keys.decoding_key(), &self.validation)?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}
