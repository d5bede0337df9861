//! Prometheus metrics collection for plugcmd.
//!
//! - `plugcmd_command_total{command}` - Terminal dispatches by command path
//! - `plugcmd_command_duration_seconds{command}` - Handler latency histogram
//! - `plugcmd_command_errors_total{command,error}` - Mapped handler failures
//! - `plugcmd_completion_total{result}` - Completion requests (matched/fallback)
//! - `plugcmd_unknown_label_total` - Invocations no root claimed
//! - `plugcmd_registered_roots` - Root commands in the sealed registry
//!
//! Recording before [`init`] is a no-op.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters
// ========================================================================

/// Terminal dispatches by command.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Handler latency by command.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Handler failures by command and error kind.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Completion requests by outcome.
pub static COMPLETIONS: OnceLock<IntCounterVec> = OnceLock::new();

/// Invocations whose label matched no root.
pub static UNKNOWN_LABELS: OnceLock<IntCounter> = OnceLock::new();

// ========================================================================
// Gauges
// ========================================================================

/// Distinct root commands in the sealed registry.
pub static REGISTERED_ROOTS: OnceLock<IntGauge> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Call once at startup before any metrics are recorded. Later calls are
/// harmless.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            if $metric.get().is_none() {
                match $init {
                    Ok(m) => {
                        if let Err(e) = r.register(Box::new(m.clone())) {
                            tracing::warn!(metric = stringify!($metric), error = %e, "Failed to register metric");
                        }
                        if $metric.set(m).is_err() {
                            tracing::debug!(metric = stringify!($metric), "Metric already initialized");
                        }
                    }
                    Err(e) => {
                        tracing::error!(metric = stringify!($metric), error = %e, "Failed to create metric");
                    }
                }
            }
        };
    }

    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("plugcmd_command_total", "Terminal command dispatches by command path"), &["command"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("plugcmd_command_duration_seconds", "Command handler latency by command path")
            .buckets(vec![0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(Opts::new("plugcmd_command_errors_total", "Command handler failures by kind"), &["command", "error"]));
    register!(COMPLETIONS, IntCounterVec::new(Opts::new("plugcmd_completion_total", "Completion requests by outcome"), &["result"]));
    register!(UNKNOWN_LABELS, IntCounter::new("plugcmd_unknown_label_total", "Invocations no registered root claimed"));
    register!(REGISTERED_ROOTS, IntGauge::new("plugcmd_registered_roots", "Root commands in the sealed registry"));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions for metric updates
// ============================================================================

/// Record a terminal dispatch and its latency.
#[inline]
pub fn record_command(command: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[command]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

/// Record a command error.
#[inline]
pub fn record_command_error(command: &str, error: &str) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[command, error]).inc();
    }
}

/// Record a completion request; `matched` is false for the fallback list.
#[inline]
pub fn record_completion(matched: bool) {
    if let Some(c) = COMPLETIONS.get() {
        let result = if matched { "matched" } else { "fallback" };
        c.with_label_values(&[result]).inc();
    }
}

/// Record an invocation no root claimed.
#[inline]
pub fn record_unknown_label() {
    if let Some(c) = UNKNOWN_LABELS.get() {
        c.inc();
    }
}

/// Set the number of registered root commands.
#[inline]
pub fn set_registered_roots(count: usize) {
    if let Some(g) = REGISTERED_ROOTS.get() {
        g.set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_metrics_are_gathered() {
        init();
        init();

        record_command("metricstest", 0.001);
        record_command_error("metricstest", "validation");
        record_completion(false);
        record_unknown_label();
        set_registered_roots(3);

        let text = gather_metrics();
        assert!(text.contains("plugcmd_command_total{command=\"metricstest\"}"));
        assert!(text.contains("plugcmd_command_errors_total{command=\"metricstest\",error=\"validation\"}"));
        assert!(text.contains("plugcmd_completion_total{result=\"fallback\"}"));
        assert!(text.contains("plugcmd_unknown_label_total"));
        assert!(text.contains("plugcmd_registered_roots"));
    }
}
