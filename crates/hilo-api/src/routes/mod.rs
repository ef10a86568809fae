//! # Route Modules
//!
//! Each module defines an Axum Router for one API surface area. Routers
//! are assembled in [`crate::app`] behind the metrics and guard layers.
//!
//! - `ping`: `GET /ping`, allowlisted liveness check for clients.
//! - `auth`: `GET /api/v1/auth/whoami`, `POST /api/v1/auth/refresh`.
//! - `metrics`: `GET /metrics`, Prometheus text exposition.

pub mod auth;
pub mod metrics;
pub mod ping;

use crate::error::AppError;

/// Fallback for unmatched routes.
pub async fn not_found(uri: axum::http::Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}
