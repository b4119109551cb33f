//! Observability for save and load
//!
//! - Structured logging (JSON lines)
//! - Counters for saves, loads and trust-gate outcomes
//!
//! # Principles
//!
//! 1. Observability is read-only; it never changes a save or load result
//! 2. No background threads
//! 3. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use rocketstore::observability::{log_event_with_fields, Event, FormatMetrics};
//!
//! log_event_with_fields(Event::LoadComplete, &[("version", "108")]);
//!
//! let metrics = FormatMetrics::new();
//! metrics.increment_loads();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity, LOG_LEVEL_ENV};
pub use metrics::{FormatMetrics, MetricsSnapshot};

/// Log an event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event at its own severity with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

/// Log an event at an explicit severity
pub fn log_event_at(severity: Severity, event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity, event.as_str(), fields);
}
