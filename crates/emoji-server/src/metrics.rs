//! Prometheus metrics recorder and metric names.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Install the Prometheus metrics recorder (global).
///
/// Returns the `PrometheusHandle` used to render the `/metrics` endpoint.
/// Call once at startup before any metrics are recorded.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("prometheus metrics recorder installed");
    Ok(handle)
}

/// Render Prometheus text format from the installed recorder.
pub fn render(handle: &PrometheusHandle) -> String {
    handle.render()
}

// Metric name constants to avoid typos across modules.

/// Search requests total (counter).
pub const SEARCH_REQUESTS_TOTAL: &str = "emoji_search_requests_total";
/// API errors total (counter, labels: kind).
pub const ERRORS_TOTAL: &str = "emoji_search_errors_total";
/// Search duration seconds (histogram).
pub const SEARCH_DURATION_SECONDS: &str = "emoji_search_duration_seconds";
/// Indexed entries (gauge).
pub const INDEX_ENTRIES: &str = "emoji_index_entries";
