//! Tracing setup
//!
//! RUST_LOG takes precedence over the configured filter. Spans carry W3C trace
//! context into outgoing HTTP requests through the global propagator.

use opentelemetry::global;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_FILTER: &str = "info";

/// RUST_LOG when set, else `default_filter`, else [`DEFAULT_LOG_FILTER`].
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber. Returns false when one was already installed.
pub fn init_logging(default_filter: &str) -> bool {
    global::set_text_map_propagator(TraceContextPropagator::new());

    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}
