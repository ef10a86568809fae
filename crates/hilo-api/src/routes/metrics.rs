//! `GET /metrics`: the [`ApiMetrics`] registry in Prometheus text format.
//!
//! Not allowlisted by default: scrapers need a token granting `/metrics`.

use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use prometheus::TEXT_FORMAT;

use crate::error::AppError;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/metrics", get(render))
}

async fn render(
    Extension(metrics): Extension<ApiMetrics>,
) -> Result<impl IntoResponse, AppError> {
    let body = metrics.gather_and_encode().map_err(AppError::Internal)?;
    Ok(([(header::CONTENT_TYPE, TEXT_FORMAT)], body))
}
