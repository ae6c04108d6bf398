//! Logging setup and structured log helpers

use std::time::Duration;

use intentrelay_domain::IntentRelayError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber
///
/// `RUST_LOG` wins when set; otherwise `default_level` (the configured
/// `log_level`), falling back to `info` when that is not a valid filter.
/// Calling this twice keeps the first subscriber.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init();
}

/// Log the outcome of a routed command with structured fields.
///
/// `route` is a stable label (`"process"` or `"route"`). Command text never
/// reaches this helper.
#[inline]
pub fn log_route_execution(route: &str, user_id: &str, elapsed: Duration, success: bool) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    if success {
        info!(route, user_id, duration_ms, "route_execution_success");
    } else {
        warn!(route, user_id, duration_ms, "route_execution_failure");
    }
}

/// Convert an `IntentRelayError` into a stable label for logging.
#[inline]
pub fn error_label(error: &IntentRelayError) -> &'static str {
    match error {
        IntentRelayError::Validation(_) => "validation",
        IntentRelayError::Auth(_) => "auth",
        IntentRelayError::Upstream(_) => "upstream",
        IntentRelayError::Network(_) => "network",
        IntentRelayError::Database(_) => "database",
        IntentRelayError::Config(_) => "config",
        IntentRelayError::NotFound(_) => "not_found",
        IntentRelayError::MalformedIntent(_) => "malformed_intent",
        IntentRelayError::InvalidInput(_) => "invalid_input",
        IntentRelayError::Internal(_) => "internal",
    }
}
