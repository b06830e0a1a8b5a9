//! Prometheus registry for the command line.
//!
//! Registers the core metrics alongside a per-command counter so a run can
//! dump everything it touched with `--metrics`.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Commands run, by name and result.
pub static COMMANDS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("hemaroute_cli_commands_total", "Commands run by the CLI"),
        &["command", "result"], // result: "ok", "error"
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(COMMANDS_TOTAL.clone()))
        .unwrap();

    // Core metrics (location, search, feedback, auth)
    for metric in hemaroute_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

pub fn record_command(command: &str, ok: bool) {
    COMMANDS_TOTAL
        .with_label_values(&[command, if ok { "ok" } else { "error" }])
        .inc();
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Metrics output is not UTF-8")
}
