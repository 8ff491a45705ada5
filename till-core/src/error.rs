//! Error types for the simulation kernel

use crate::{EventId, ProcessId};
use thiserror::Error;

/// Top-level error type for simulation operations.
///
/// Every variant is an internal defect: a run that returns one of these has
/// been aborted and its partial output must not be trusted.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Event error: {0}")]
    Event(#[from] EventError),

    #[error("Distribution error: {0}")]
    Distribution(#[from] DistributionError),

    #[error("Process not found with ID: {id}")]
    ProcessNotFound { id: ProcessId },

    #[error("{id} resumed after it terminated")]
    ProcessTerminated { id: ProcessId },

    #[error("{id} resumed while already running")]
    ProcessReentered { id: ProcessId },

    #[error("{id} received {event} while {state}")]
    UnexpectedEvent {
        id: ProcessId,
        state: String,
        event: String,
    },

    #[error("Resource invariant violated: {0}")]
    Resource(String),
}

/// Errors related to event scheduling
#[derive(Debug, Error)]
pub enum EventError {
    /// A wake-up saturated at [`crate::SimTime::MAX`]; time cannot move past it.
    #[error("{id} for {target} is due at the end of representable time")]
    ClockExhausted { id: EventId, target: ProcessId },
}

/// Invalid distribution parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    #[error("rate must be positive and finite, got {rate}")]
    InvalidRate { rate: f64 },

    #[error("standard deviation must be non-negative and finite, got {std}")]
    InvalidStdDev { std: f64 },

    #[error("mean must be finite, got {mean}")]
    InvalidMean { mean: f64 },
}
