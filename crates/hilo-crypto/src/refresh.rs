//! # Token Refresh
//!
//! Renewal of a token whose signature is still good but whose expiry has
//! lapsed. Possession of such a token is treated as proof of a prior
//! successful authentication.
//!
//! ```text
//! verify fails          → same error as verify
//! verified, not expired → original token, unchanged
//! verified, expired     → same claims, exp = now + renewal, newly signed
//! ```

use chrono::Duration;

use hilo_core::{check_expiry_at, NumericDate, TokenState};

use crate::codec::{SignedToken, TokenCodec};
use crate::error::TokenError;

impl TokenCodec {
    /// Refresh `token` relative to the current instant.
    pub fn refresh(&self, token: &str, renewal: Duration) -> Result<SignedToken, TokenError> {
        self.refresh_at(token, renewal, NumericDate::now())
    }

    /// Refresh `token` as if the current instant were `now`.
    pub fn refresh_at(
        &self,
        token: &str,
        renewal: Duration,
        now: NumericDate,
    ) -> Result<SignedToken, TokenError> {
        let claims = self.verify(token)?;

        match check_expiry_at(&claims, now) {
            TokenState::Valid => Ok(SignedToken::from_verified(token)),
            TokenState::Expired => {
                let expires_at = now.offset(renewal);
                tracing::debug!(
                    user_id = claims.user_id.as_deref().unwrap_or_default(),
                    expires_at = %expires_at,
                    "renewing expired token"
                );
                self.sign(&claims.with_expiry(expires_at))
            }
        }
    }
}
