//! # Request/Response Tracing
//!
//! `tower_http::trace::TraceLayer` for structured request logging, plus
//! subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Build the `TraceLayer` wrapping every API request.
///
/// Each request gets a span with method, URI, and status code. Query
/// strings may carry credentials, so only the path is recorded.
pub fn layer() -> tower_http::trace::TraceLayer<
    tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>,
    impl Fn(&axum::http::Request<axum::body::Body>) -> tracing::Span + Clone,
> {
    tower_http::trace::TraceLayer::new_for_http().make_span_with(
        |request: &axum::http::Request<axum::body::Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
            )
        },
    )
}

/// Install the global subscriber. `RUST_LOG` wins; otherwise `info`.
pub fn init_subscriber(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_constructs_without_panic() {
        let _layer = layer();
    }
}
