//! # Authentication & Authorization Middleware
//!
//! ES256 bearer-token guard with prefix permissions.
//!
//! ## Request Flow
//!
//! ```text
//! allowlisted target?            → continue, no credential needed
//! ?access_token=<token>          → token
//! else Authorization: Bearer ... → token
//! verify signature (ES256 only)  → INVALID_TOKEN on failure
//! check expiry                   → TOKEN_EXPIRED
//! match permissions              → PERMISSION_DENIED
//! attach Principal               → continue
//! ```
//!
//! ## Matching Target
//!
//! A request is judged by one string. When it matched a route, that is the
//! route pattern (`/api/v1/users/:id`, never `/api/v1/users/42`), so an
//! allowlist entry or permission names routes, not concrete paths. Requests
//! that matched no route are judged by their raw path.
//!
//! ## Principal
//!
//! Every authenticated request gets a [`Principal`] injected into the
//! request extensions. Handlers extract it via the `FromRequestParts` impl.
//! The guard keeps no state between requests.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{MatchedPath, Query, Request};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, HeaderName, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use hilo_core::permission::grants;
use hilo_core::{authorize, check_expiry, AuthError, AuthFailure, Claims, NumericDate, TokenState};
use hilo_crypto::TokenCodec;

use crate::config::{DEFAULT_ALLOWED_PATHS, DEFAULT_QUERY_PARAM, DEFAULT_SCHEME};
use crate::error::AppError;

// ── Principal ───────────────────────────────────────────────────────────────

/// Identity of the authenticated caller, decoded from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub permissions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<NumericDate>,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            subject: claims.subject,
            permissions: claims.permissions,
            expires_at: claims.expires_at,
        }
    }
}

/// Extracts the principal the guard injected into extensions.
/// Returns 401 if none is present (guard disabled or route allowlisted).
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AppError::Auth(AuthError::Unauthenticated(
                AuthFailure::MissingCredential,
            )))
    }
}

// ── Guard Configuration ─────────────────────────────────────────────────────

/// Where credentials are read from and which paths skip authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardSettings {
    /// Path prefixes exempt from authentication.
    pub allowed_paths: Vec<String>,
    /// Query parameter checked before the header.
    pub query_param: String,
    pub header: HeaderName,
    /// Required header prefix, trailing space included.
    pub scheme: String,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            allowed_paths: DEFAULT_ALLOWED_PATHS.iter().map(|p| p.to_string()).collect(),
            query_param: DEFAULT_QUERY_PARAM.to_string(),
            header: header::AUTHORIZATION,
            scheme: DEFAULT_SCHEME.to_string(),
        }
    }
}

/// The string a request's authorization is judged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTarget<'a> {
    /// Pattern of the route the request matched.
    Route(&'a str),
    /// Raw path of a request that matched no route.
    Unmatched(&'a str),
}

impl<'a> RequestTarget<'a> {
    /// The route pattern when there is one, otherwise the raw path.
    pub fn resolve(route: Option<&'a str>, path: &'a str) -> Self {
        match route {
            Some(route) => Self::Route(route),
            None => Self::Unmatched(path),
        }
    }

    pub fn as_str(&self) -> &'a str {
        match self {
            Self::Route(s) | Self::Unmatched(s) => s,
        }
    }
}

/// Result of a successful guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Allowlisted; no credential was examined.
    Bypassed,
    Authenticated(Principal),
}

// ── Guard ───────────────────────────────────────────────────────────────────

/// Per-request authentication and authorization.
///
/// Cheap to clone; injected into request extensions for
/// [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct Guard {
    codec: Arc<TokenCodec>,
    settings: Arc<GuardSettings>,
}

impl Guard {
    pub fn new(codec: Arc<TokenCodec>, settings: GuardSettings) -> Self {
        Self {
            codec,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &GuardSettings {
        &self.settings
    }

    /// Is `target` exempt from authentication?
    pub fn is_allowlisted(&self, target: &RequestTarget<'_>) -> bool {
        self.settings
            .allowed_paths
            .iter()
            .any(|prefix| grants(prefix, target.as_str()))
    }

    /// Pull the raw token from the query string, falling back to the header.
    ///
    /// An empty query value counts as absent.
    pub fn extract_token(&self, uri: &Uri, headers: &HeaderMap) -> Result<String, AuthFailure> {
        if let Some(token) = Query::<HashMap<String, String>>::try_from_uri(uri)
            .ok()
            .and_then(|Query(mut params)| params.remove(&self.settings.query_param))
            .filter(|token| !token.is_empty())
        {
            return Ok(token);
        }

        let value = match headers.get(&self.settings.header) {
            Some(value) if !value.is_empty() => value,
            _ => return Err(AuthFailure::MissingCredential),
        };
        value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix(self.settings.scheme.as_str()))
            .map(str::to_string)
            .ok_or(AuthFailure::MalformedCredential)
    }

    /// Run the full guard sequence for one request.
    pub fn check(
        &self,
        target: &RequestTarget<'_>,
        uri: &Uri,
        headers: &HeaderMap,
    ) -> Result<GuardOutcome, AuthError> {
        if self.is_allowlisted(target) {
            return Ok(GuardOutcome::Bypassed);
        }

        let token = self.extract_token(uri, headers)?;

        let claims = self.codec.verify(&token).map_err(|err| {
            let reason = err.verification_failure().map(|r| r.as_str());
            tracing::warn!(reason = reason.unwrap_or("internal"), "token rejected by codec");
            AuthFailure::VerificationFailed
        })?;

        if check_expiry(&claims) == TokenState::Expired {
            return Err(AuthFailure::Expired.into());
        }

        if !authorize(&claims, target.as_str()) {
            return Err(AuthError::PermissionDenied);
        }

        Ok(GuardOutcome::Authenticated(Principal::from(claims)))
    }
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Authenticate the request with the [`Guard`] found in its extensions.
///
/// On success the [`Principal`] is inserted into request extensions for
/// downstream handlers. A missing guard fails closed with 500.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let Some(guard) = request.extensions().get::<Guard>().cloned() else {
        return AppError::Internal("auth guard not configured".into()).into_response();
    };

    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned());
    let target = RequestTarget::resolve(route.as_deref(), request.uri().path());

    match guard.check(&target, request.uri(), request.headers()) {
        Ok(GuardOutcome::Bypassed) => next.run(request).await,
        Ok(GuardOutcome::Authenticated(principal)) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(
                code = err.code(),
                path = %request.uri().path(),
                route = route.as_deref().unwrap_or("-"),
                "request rejected: {err}"
            );
            AppError::Auth(err).into_response()
        }
    }
}
