//! # CORS
//!
//! Browser clients carry the bearer token in `Authorization`, so the
//! preflight answer must allow that header. The layer sits outside the
//! guard: preflight requests carry no credential and are answered here.

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Origins used when `SERVER_ALLOW_ORIGINS` is unset.
pub const DEFAULT_ALLOW_ORIGINS: &[&str] = &["http://localhost", "https://localhost"];

/// Which origins may call the API from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsSettings {
    /// Allow every origin; `allow_origins` is then ignored.
    pub allow_all_origins: bool,
    pub allow_origins: Vec<HeaderValue>,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allow_all_origins: false,
            allow_origins: DEFAULT_ALLOW_ORIGINS
                .iter()
                .map(|origin| HeaderValue::from_static(origin))
                .collect(),
        }
    }
}

/// Build the CORS layer for `settings`.
pub fn layer(settings: &CorsSettings) -> CorsLayer {
    let origins = if settings.allow_all_origins {
        tracing::warn!("CORS: allowing all origins");
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(settings.allow_origins.iter().cloned())
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::HEAD,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ACCEPT_ENCODING,
            header::ACCEPT_LANGUAGE,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([header::CONTENT_LENGTH])
}
