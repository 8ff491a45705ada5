//! Structured logging for simulation runs
//!
//! The kernel and the models built on it log through `tracing`. Nothing is
//! printed unless the binary installs a subscriber, for example with one of
//! the initializers below.
//!
//! # Controlling the output
//!
//! ```rust
//! use till_core::logging::init_simulation_logging_with_level;
//!
//! init_simulation_logging_with_level("debug");
//! ```
//!
//! `RUST_LOG` takes precedence over the level passed in:
//!
//! ```bash
//! RUST_LOG=till_core::scheduler=trace,till_store=debug cargo run --example store_day
//! ```
//!
//! # Log level guidelines
//! - **TRACE**: every scheduled and processed event
//! - **DEBUG**: process spawns, resource grants and customer state changes
//! - **INFO**: start and end of a run, summary counts
//! - **WARN**: unusual but legal conditions, such as customers cut off by the horizon
//! - **ERROR**: invariant violations that abort a run
//!
//! The initializers can be called more than once (from several tests, say);
//! only the first call installs a subscriber.

use tracing::{info, Span};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{EventId, SimTime};

/// Initialize logging at INFO level.
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info")
}

/// Initialize logging with a specific level
///
/// # Arguments
/// * `level` - Log level: "trace", "debug", "info", "warn", or "error"
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{level},till_core::scheduler=info").into());

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("Simulation logging initialized at level: {}", level);
    }
}

/// Everything down to TRACE, pretty-printed.
pub fn init_detailed_simulation_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "trace,till_core=trace,till_components=debug".into());

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .pretty(),
        )
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("Detailed simulation logging initialized");
    }
}

/// Create a span for tracking one simulation run
pub fn simulation_span(name: &str, seed: u64) -> Span {
    tracing::info_span!("simulation", name = name, seed = seed)
}

/// Create a span for tracking event processing
pub fn event_span(event_id: EventId, time: SimTime) -> Span {
    tracing::trace_span!("event", id = %event_id, time = %time)
}

/// Logging utilities for common simulation events
pub mod events {
    use super::*;
    use tracing::warn;

    /// Log simulation start
    pub fn simulation_started(name: &str, horizon: Option<SimTime>) {
        match horizon {
            Some(end) => info!(simulation = name, horizon = %end, "Simulation started"),
            None => info!(simulation = name, "Simulation started (unbounded)"),
        }
    }

    /// Log simulation completion
    pub fn simulation_completed(name: &str, final_time: SimTime, events_processed: u64) {
        info!(
            simulation = name,
            final_time = %final_time,
            events_processed = events_processed,
            "Simulation completed"
        );
    }

    /// Log processes still suspended when the run stopped
    pub fn cut_off_at_horizon(name: &str, horizon: SimTime, live_processes: usize) {
        if live_processes > 0 {
            warn!(
                simulation = name,
                horizon = %horizon,
                live_processes = live_processes,
                "Processes still in flight at the horizon"
            );
        }
    }
}
