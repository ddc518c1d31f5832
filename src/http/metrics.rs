//! Prometheus metrics for the HTTP API.
//!
//! Handlers record through the `metrics` facade; nothing is collected unless
//! `serve` installed the Prometheus recorder (`[metrics] enabled = true`).

use anyhow::Context;
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder.
///
/// # Errors
///
/// Returns an error if a recorder is already installed.
pub fn install_recorder() -> anyhow::Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}

pub(crate) fn record_catalog_operation(operation: &'static str) {
    counter!("notecraft_catalog_operations_total", "operation" => operation).increment(1);
}

/// `outcome` is `ok` or an error kind (`invalid`, `not_found`, `timeout`, ...).
pub(crate) fn record_generation(mode: &'static str, outcome: &'static str) {
    counter!("notecraft_generations_total", "mode" => mode, "outcome" => outcome).increment(1);
}

pub(crate) fn record_asset_fetch(outcome: &'static str) {
    counter!("notecraft_asset_fetches_total", "outcome" => outcome).increment(1);
}
