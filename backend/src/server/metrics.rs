//! Optional Prometheus metrics middleware.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use tracing::warn;

const NAMESPACE: &str = "tracker";
const ENDPOINT: &str = "/metrics";

/// Build the metrics middleware, logging and returning `None` on failure.
///
/// A broken metrics registry must not stop the tracker from serving.
pub(crate) fn initialize_metrics<F, E>(build: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "Prometheus metrics disabled");
            None
        }
    }
}

/// Metrics middleware exposing `/metrics` under the `tracker` namespace.
pub(crate) fn default_metrics() -> Option<PrometheusMetrics> {
    initialize_metrics(|| {
        PrometheusMetricsBuilder::new(NAMESPACE)
            .endpoint(ENDPOINT)
            .build()
    })
}
