//! Error types for model components

use thiserror::Error;
use till_core::SimError;

/// Errors related to resource pool operations
///
/// These indicate a broken model, not a recoverable condition: the run that
/// raised one is aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("Release on idle pool '{pool}'")]
    ReleaseOnIdlePool { pool: String },

    #[error("Pool '{pool}' has no active grant {token}")]
    UnknownGrant { pool: String, token: u64 },

    #[error("Pool '{pool}' invariant violated: {detail}")]
    InvariantViolated { pool: String, detail: String },
}

impl From<ResourceError> for SimError {
    fn from(err: ResourceError) -> Self {
        SimError::Resource(err.to_string())
    }
}
