//! # Token Lifecycle
//!
//! Expiry state of a decoded claim set.
//!
//! ```text
//! exp absent            → Valid  (never expires)
//! exp >  now            → Valid
//! exp <= now            → Expired
//! ```
//!
//! The check is applied only to claims whose signature already verified.
//! Renewal of expired tokens lives with the codec in `hilo-crypto`.

use serde::{Deserialize, Serialize};

use crate::claims::Claims;
use crate::temporal::NumericDate;

/// Expiry state of a verified claim set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenState {
    Valid,
    Expired,
}

impl TokenState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Expired => "expired",
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

impl std::fmt::Display for TokenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expiry state of `claims` at the current instant.
pub fn check_expiry(claims: &Claims) -> TokenState {
    check_expiry_at(claims, NumericDate::now())
}

/// Expiry state of `claims` at `now`. A token expiring exactly at `now`
/// is already expired.
pub fn check_expiry_at(claims: &Claims, now: NumericDate) -> TokenState {
    match claims.expires_at {
        Some(exp) if exp <= now => TokenState::Expired,
        _ => TokenState::Valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::ClaimsBuilder;
    use chrono::Duration;

    #[test]
    fn expiry_equal_to_now_is_expired() {
        let now = NumericDate::from_seconds(1_000);
        let claims = ClaimsBuilder::at(now).expires_after(Duration::zero()).build();
        assert_eq!(check_expiry_at(&claims, now), TokenState::Expired);
    }

    #[test]
    fn expiry_one_second_ahead_is_valid() {
        let now = NumericDate::from_seconds(1_000);
        let claims = ClaimsBuilder::at(now)
            .expires_after(Duration::seconds(1))
            .build();
        assert_eq!(check_expiry_at(&claims, now), TokenState::Valid);
        assert_eq!(
            check_expiry_at(&claims, now.offset(Duration::seconds(1))),
            TokenState::Expired
        );
    }

    #[test]
    fn no_expiry_is_valid_forever() {
        let claims = ClaimsBuilder::at(NumericDate::from_seconds(0)).build();
        assert_eq!(
            check_expiry_at(&claims, NumericDate::from_seconds(i64::MAX)),
            TokenState::Valid
        );
        assert_eq!(check_expiry(&claims), TokenState::Valid);
    }

    #[test]
    fn already_expired_claims_report_expired() {
        let claims = Claims::builder()
            .expires_after(Duration::seconds(-50))
            .build();
        assert!(check_expiry(&claims).is_expired());
    }

    #[test]
    fn state_strings() {
        assert_eq!(TokenState::Valid.to_string(), "valid");
        assert_eq!(TokenState::Expired.to_string(), "expired");
    }
}
