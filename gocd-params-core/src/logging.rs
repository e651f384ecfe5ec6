//! Structured logging using **tracing**.
//!
//! Events go to stderr as JSON so stdout only ever carries the report.

use tracing::{error, info, warn};

/// Initializes the global tracing subscriber.
///
/// Call once at startup.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=gocd_params_core=debug`)
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr) // stdout is reserved for the report
        .init();
}

/// Logs a warning event.
pub fn log_warn(message: &str) {
    warn!(detail = %message);
}

/// Logs an info event.
pub fn log_info(message: &str) {
    info!(detail = %message);
}

/// Logs an error event.
pub fn log_error(message: &str) {
    error!(detail = %message);
}

/// Logs an event whose level is picked from its name.
///
/// `ERROR` and `WARN`/`WARNING` (any case) map to those levels, anything
/// else is logged at info.
pub fn log_event(event: &str, detail: &str) {
    match event_level(event) {
        tracing::Level::ERROR => error!(event = %event, detail = %detail),
        tracing::Level::WARN => warn!(event = %event, detail = %detail),
        _ => info!(event = %event, detail = %detail),
    }
}

fn event_level(event: &str) -> tracing::Level {
    match event.to_uppercase().as_str() {
        "ERROR" => tracing::Level::ERROR,
        "WARN" | "WARNING" => tracing::Level::WARN,
        _ => tracing::Level::INFO,
    }
}
