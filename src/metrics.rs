// src/metrics.rs
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const POST_ANALYSES_TOTAL: &str = "post_analyses_total";
pub const SIGNAL_FALLBACKS_TOTAL: &str = "signal_fallbacks_total";
pub const POST_FINAL_SCORE: &str = "post_final_score";

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(POST_ANALYSES_TOTAL, "Posts scored by /analyze-post.");
        describe_counter!(
            SIGNAL_FALLBACKS_TOTAL,
            "Signals that used their fallback value, by signal."
        );
        describe_histogram!(POST_FINAL_SCORE, "Fused final score (0-100).");
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Fails if one is already installed.
    pub fn init() -> Result<Self, BuildError> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
