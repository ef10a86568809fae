//! # Request Metrics
//!
//! Prometheus registry exported by `GET /metrics`. The middleware sits
//! outside the guard so rejected requests are counted too.
//!
//! Requests are labelled by the matched route pattern, never the raw path,
//! so path parameters cannot blow up label cardinality.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{
    core::Collector, Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry,
    TextEncoder,
};

/// Path label for requests no route matched.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics")
            .field("requests", &self.requests())
            .field("unauthenticated", &self.unauthenticated())
            .field("forbidden", &self.forbidden())
            .finish()
    }
}

impl ApiMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("hilo_http_requests_total", "HTTP requests handled"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "hilo_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0]),
            &["method", "path"],
        )
        .expect("metric can be created");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("metric can be registered");

        Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
            }),
        }
    }

    /// Total requests across all labels.
    pub fn requests(&self) -> u64 {
        self.count_where(|_| true)
    }

    /// Responses with status 401.
    pub fn unauthenticated(&self) -> u64 {
        self.count_where(|status| status == "401")
    }

    /// Responses with status 403.
    pub fn forbidden(&self) -> u64 {
        self.count_where(|status| status == "403")
    }

    fn count_where(&self, status_matches: impl Fn(&str) -> bool) -> u64 {
        let mut total = 0u64;
        for family in &self.inner.http_requests_total.collect() {
            for metric in family.get_metric() {
                let selected = metric
                    .get_label()
                    .iter()
                    .any(|pair| pair.get_name() == "status" && status_matches(pair.get_value()));
                if selected {
                    total += metric.get_counter().get_value() as u64;
                }
            }
        }
        total
    }

    fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status])
            .inc();
        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Gather every registered metric in the Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.inner.registry.gather(), &mut buffer)
            .map_err(|e| format!("failed to encode metrics: {e}"))?;
        String::from_utf8(buffer).map_err(|e| format!("metrics are not UTF-8: {e}"))
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware that records every response by method, route and status.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_PATH.to_owned());
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        let status = response.status().as_u16();
        m.record_request(&method, &path, status, start.elapsed().as_secs_f64());
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_starts_at_zero() {
        let m = ApiMetrics::default();
        assert_eq!(m.requests(), 0);
        assert_eq!(m.unauthenticated(), 0);
        assert_eq!(m.forbidden(), 0);
    }

    #[test]
    fn counts_by_status() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/ping", 200, 0.001);
        m.record_request("GET", "/metrics", 401, 0.001);
        m.record_request("POST", "/api/v1/auth/refresh", 401, 0.001);
        m.record_request("GET", "/metrics", 403, 0.001);
        m.record_request("GET", UNMATCHED_PATH, 404, 0.001);

        assert_eq!(m.requests(), 5);
        assert_eq!(m.unauthenticated(), 2);
        assert_eq!(m.forbidden(), 1);
    }

    #[test]
    fn clones_share_registry() {
        let m = ApiMetrics::new();
        m.clone().record_request("GET", "/ping", 200, 0.001);
        assert_eq!(m.requests(), 1);
    }

    #[test]
    fn encodes_labelled_series() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/metrics", 403, 0.002);
        let text = m.gather_and_encode().unwrap();
        assert!(text.contains("# TYPE hilo_http_requests_total counter"));
        assert!(text
            .contains(r#"hilo_http_requests_total{method="GET",path="/metrics",status="403"} 1"#));
        assert!(text.contains("hilo_http_request_duration_seconds_count"));
    }

    #[test]
    fn concurrent_increments_are_counted() {
        let m = ApiMetrics::new();
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let m = m.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        m.record_request("GET", "/ping", 200, 0.0);
                        m.record_request("GET", "/metrics", 401, 0.0);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(m.requests(), 4000);
        assert_eq!(m.unauthenticated(), 2000);
    }
}
