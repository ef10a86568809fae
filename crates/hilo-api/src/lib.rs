//! # hilo-api: Axum HTTP Service for the Hilo API
//!
//! Hosts the ES256 bearer-token guard and the routes that depend on it.
//!
//! ## API Surface
//!
//! | Route                        | Module             | Auth                     |
//! |------------------------------|--------------------|--------------------------|
//! | `GET /health/liveness`       | here               | none (outside the guard) |
//! | `GET /health/readiness`      | here               | none (outside the guard) |
//! | `GET /ping`                  | [`routes::ping`]   | allowlisted              |
//! | `GET /metrics`               | [`routes::metrics`]| permission `/metrics`    |
//! | `GET /api/v1/auth/whoami`    | [`routes::auth`]   | any covering permission  |
//! | `POST /api/v1/auth/refresh`  | [`routes::auth`]   | allowlisted              |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → MetricsMiddleware → TimeoutLayer → AuthMiddleware → Handler
//! ```
//!
//! The guard layer is installed only when `SERVER_JWT_GUARD` is true.
//! CORS wraps the health probes as well and answers preflight requests
//! before the guard sees them.
//!
//! ## Crate Policy
//!
//! - No token logic in route handlers; it lives in `hilo-crypto` and
//!   `hilo-core`.
//! - All errors map to structured HTTP responses via [`AppError`].

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::timeout::TimeoutLayer;

use crate::auth::Guard;
use crate::middleware::metrics::ApiMetrics;

pub use config::{AppConfig, ConfigError};
pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the guard so they
/// remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    app_with_metrics(state, ApiMetrics::new())
}

/// [`app`], counting into the given metrics handle.
pub fn app_with_metrics(state: AppState, metrics: ApiMetrics) -> Router {
    let guard = Guard::new(state.codec.clone(), state.config.guard.clone());
    let cors = middleware::cors::layer(&state.config.cors);

    let api = Router::new()
        .merge(routes::ping::router())
        .merge(routes::auth::router())
        .merge(routes::metrics::router())
        .fallback(routes::not_found);

    let api = if state.config.jwt_guard {
        api.layer(from_fn(auth::auth_middleware))
    } else {
        tracing::warn!("JWT guard disabled; API routes are unauthenticated");
        api
    };

    let api = api
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(guard))
        .layer(axum::Extension(metrics))
        .with_state(state);

    // Unauthenticated health probes.
    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api).layer(cors)
}

/// Liveness probe: returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. The key pair is loaded before the router exists.
async fn readiness() -> &'static str {
    "ready"
}
