//! # Token Claims
//!
//! The payload embedded in every signed token: the registered JWT fields
//! plus the two fields the API layer consumes, `user_id` and `permissions`.
//!
//! ## Wire Names
//!
//! ```text
//! iss  sub  aud  jti  iat  nbf  exp  user_id  permissions
//! ```
//!
//! Absent optional fields are omitted. `aud` is written as a bare string
//! when it holds a single entry and as an array otherwise; both forms are
//! accepted on decode.
//!
//! A [`Claims`] value is never mutated after signing. Renewal produces a new
//! value through [`Claims::with_expiry`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::temporal::NumericDate;

/// Authenticated identity and its authorization scope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer.
    #[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Free-form subject string.
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Intended audiences.
    #[serde(
        rename = "aud",
        default,
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_audience",
        deserialize_with = "deserialize_audience"
    )]
    pub audience: Vec<String>,

    /// Token identifier.
    #[serde(rename = "jti", default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,

    #[serde(rename = "iat", default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<NumericDate>,

    #[serde(rename = "nbf", default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<NumericDate>,

    /// Expiry. `None` means the token never expires.
    #[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<NumericDate>,

    /// Principal identifier consumed by downstream handlers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Path prefixes this token may access, in grant order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
}

impl Claims {
    /// Start a builder stamped with the current instant.
    pub fn builder() -> ClaimsBuilder {
        ClaimsBuilder::new()
    }

    /// A copy of these claims with `expires_at` replaced.
    pub fn with_expiry(&self, expires_at: NumericDate) -> Self {
        Self {
            expires_at: Some(expires_at),
            ..self.clone()
        }
    }
}

fn serialize_audience<S: Serializer>(audience: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    match audience {
        [single] => serializer.serialize_str(single),
        many => many.serialize(serializer),
    }
}

fn deserialize_audience<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(aud)) => vec![aud],
        Some(OneOrMany::Many(aud)) => aud,
        None => Vec::new(),
    })
}

// ── Builder ─────────────────────────────────────────────────────────────────

/// Expiry policy recorded by the builder and resolved at [`ClaimsBuilder::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expiry {
    Never,
    After(Duration),
    At(NumericDate),
}

/// Chained builder for [`Claims`].
///
/// `issued_at` and `not_before` default to the instant the builder was
/// created. Without an expiry call, the built claims never expire. Nothing
/// is validated here; empty subjects and empty permission lists are legal.
#[derive(Debug, Clone)]
pub struct ClaimsBuilder {
    claims: Claims,
    expiry: Expiry,
    created: NumericDate,
}

impl ClaimsBuilder {
    /// Create a builder stamped with the current instant.
    pub fn new() -> Self {
        Self::at(NumericDate::now())
    }

    /// Create a builder as if "now" were `now`.
    pub fn at(now: NumericDate) -> Self {
        Self {
            claims: Claims {
                issued_at: Some(now),
                not_before: Some(now),
                ..Claims::default()
            },
            expiry: Expiry::Never,
            created: now,
        }
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.claims.subject = Some(subject.into());
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.claims.issuer = Some(issuer.into());
        self
    }

    pub fn audience<I, S>(mut self, audience: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.claims.audience = audience.into_iter().map(Into::into).collect();
        self
    }

    pub fn token_id(mut self, token_id: impl Into<String>) -> Self {
        self.claims.token_id = Some(token_id.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.claims.user_id = Some(user_id.into());
        self
    }

    /// Replace the permission list.
    pub fn permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.claims.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn issued_at(mut self, at: impl Into<NumericDate>) -> Self {
        self.claims.issued_at = Some(at.into());
        self
    }

    pub fn not_before(mut self, at: impl Into<NumericDate>) -> Self {
        self.claims.not_before = Some(at.into());
        self
    }

    /// Expire `duration` after the build instant. Negative durations yield
    /// claims that are already expired.
    pub fn expires_after(mut self, duration: Duration) -> Self {
        self.expiry = Expiry::After(duration);
        self
    }

    /// Expire at an absolute instant.
    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.expiry = Expiry::At(NumericDate::from_datetime(at));
        self
    }

    /// Finish. Relative expiry is measured from the builder's creation instant.
    pub fn build(self) -> Claims {
        let mut claims = self.claims;
        claims.expires_at = match self.expiry {
            Expiry::Never => None,
            Expiry::After(duration) => Some(self.created.offset(duration)),
            Expiry::At(at) => Some(at),
        };
        claims
    }
}

impl Default for ClaimsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
