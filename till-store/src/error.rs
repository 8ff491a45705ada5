//! Error types for store runs

use thiserror::Error;
use till_components::ValidationError;
use till_core::SimError;

/// Everything that can stop a store run from producing output.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The configuration was rejected before any event was scheduled.
    #[error("Invalid store configuration: {0}")]
    Config(#[from] ValidationError),

    /// An internal invariant broke while the run was in progress.
    #[error("Simulation aborted: {0}")]
    Simulation(#[from] SimError),

    #[error("Malformed configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}
