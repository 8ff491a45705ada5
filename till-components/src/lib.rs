//! Reusable simulation components for queueing models
//!
//! This crate provides building blocks shared by models on top of
//! `till-core`: counted resource pools with FIFO wait lists, and the
//! validation helpers used by model configurations.

pub mod builder;
pub mod error;
pub mod pool;
pub mod queue;

pub use builder::{
    validate_finite, validate_non_negative, validate_positive, validate_range, Validate,
    ValidationError, ValidationResult,
};
pub use error::ResourceError;
pub use pool::{Acquire, Grant, GrantToken, Handoff, PoolStats, ResourcePool};
pub use queue::{FifoQueue, Queue, QueueItem};
