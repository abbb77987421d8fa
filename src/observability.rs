use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const PREDICTIONS_TOTAL: &str = "carprice_predictions_total";
pub const INFERENCE_SECONDS: &str = "carprice_inference_seconds";

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Installs the Prometheus recorder and returns the handle `/metrics` renders from.
pub fn install_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!(PREDICTIONS_TOTAL, "Prediction requests by outcome");
    metrics::describe_histogram!(
        INFERENCE_SECONDS,
        metrics::Unit::Seconds,
        "Time spent inside the estimator"
    );
    Ok(handle)
}

pub fn record_outcome(outcome: &'static str) {
    metrics::counter!(PREDICTIONS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_inference(seconds: f64) {
    metrics::histogram!(INFERENCE_SECONDS).record(seconds);
}
