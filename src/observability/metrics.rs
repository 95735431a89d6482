//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mint_transactions_total` (counter): mint attempts by kind, outcome
//! - `mint_supply` (gauge): last observed total supply
//! - `mint_rpc_query_failures_total` (counter): failed read queries
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until an
//!   exporter is installed
//! - The Prometheus exporter is opt-in via config

use std::net::SocketAddr;

use alloy::primitives::U256;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

/// Count one mint attempt.
pub fn record_mint(kind: &'static str, outcome: &'static str) {
    metrics::counter!("mint_transactions_total", "kind" => kind, "outcome" => outcome).increment(1);
}

pub fn record_supply(supply: U256) {
    // Lossy above 2^53, which is fine for a dashboard gauge.
    let value: f64 = supply.to_string().parse().unwrap_or(f64::MAX);
    metrics::gauge!("mint_supply").set(value);
}

pub fn record_query_failure(query: &'static str) {
    metrics::counter!("mint_rpc_query_failures_total", "query" => query).increment(1);
}
