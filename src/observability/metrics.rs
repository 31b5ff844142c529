//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): requests by controller and outcome
//! - `dispatch_duration_seconds` (histogram): time spent in the dispatch pipeline
//!
//! # Design Decisions
//! - Outcome label is one of `dispatched`, `stopped`, `undefined`
//! - Exporter is optional and installed by the binary

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::DispatchOutcome;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished dispatch.
pub fn record_dispatch(controller: &str, outcome: DispatchOutcome, start: Instant) {
    metrics::counter!(
        "dispatch_requests_total",
        "controller" => controller.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    metrics::histogram!(
        "dispatch_duration_seconds",
        "controller" => controller.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
