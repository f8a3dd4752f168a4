//! Request metrics over the `metrics` crate.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::Value;

use crate::config::LogConfig;
use crate::error::Error;
use crate::logger::Fields;
use crate::stats::StatsCollector;

/// Collector turning request summaries into Prometheus series:
/// `request_log_requests_total` by method/status and
/// `request_log_request_duration_ms`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsCollector;

impl StatsCollector for MetricsCollector {
    fn record(&self, summary: &Fields) {
        let (method, status) = request_labels(summary);
        metrics::counter!(
            "request_log_requests_total",
            "method" => method.clone(),
            "status" => status.clone()
        )
        .increment(1);

        if let Some(duration) = summary.get("duration").and_then(Value::as_u64) {
            metrics::histogram!(
                "request_log_request_duration_ms",
                "method" => method,
                "status" => status
            )
            .record(duration as f64);
        }
    }
}

/// Label values pulled out of a summary; absent fields become "unknown".
fn request_labels(summary: &Fields) -> (String, String) {
    let method = summary
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let status = summary
        .get("statusCode")
        .and_then(Value::as_u64)
        .map(|code| code.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    (method, status)
}

/// Install the Prometheus exporter if metrics are enabled. Must run inside
/// a tokio runtime; the exporter spawns its scrape listener there.
pub fn init_metrics(config: &LogConfig) -> Result<(), Error> {
    if !config.metrics_enabled {
        return Ok(());
    }
    let addr: SocketAddr = config
        .metrics_address
        .parse()
        .map_err(|_| Error::InvalidMetricsAddress(config.metrics_address.clone()))?;
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    Ok(())
}
