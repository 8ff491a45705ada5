//! Virtual clock values
//!
//! The store model works in abstract model time units (the default scenario
//! uses minutes). A [`SimTime`] stores such a value as an integer number of
//! nanounits, so one model time unit equals `SimTime::from_secs(1)` and event
//! ordering never depends on floating point comparisons.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

const NANOS_PER_UNIT: f64 = 1_000_000_000.0;

/// Point in virtual time, measured from the start of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTime(u64);

impl SimTime {
    /// Largest representable instant.
    pub const MAX: SimTime = SimTime(u64::MAX);

    /// Start of the run.
    pub const fn zero() -> Self {
        SimTime(0)
    }

    pub const fn from_nanos(nanos: u64) -> Self {
        SimTime(nanos)
    }

    pub const fn from_millis(millis: u64) -> Self {
        SimTime(millis * 1_000_000)
    }

    /// Whole model time units.
    pub const fn from_secs(secs: u64) -> Self {
        SimTime(secs * 1_000_000_000)
    }

    /// Converts a sampled model-time value to the nearest tick, flooring
    /// negatives and NaN at zero and capping at [`SimTime::MAX`].
    ///
    /// Used for sampled durations, where a clamp is the expected outcome
    /// rather than an error. Rounding, not truncation, keeps the mean of a
    /// sampled gap unbiased.
    pub fn saturating_from_secs_f64(secs: f64) -> Self {
        if secs.is_nan() || secs <= 0.0 {
            return SimTime::zero();
        }
        let nanos = (secs * NANOS_PER_UNIT).round();
        if nanos >= u64::MAX as f64 {
            SimTime::MAX
        } else {
            SimTime(nanos as u64)
        }
    }

    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Value in model time units.
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / NANOS_PER_UNIT
    }

    /// Elapsed time since `earlier`, zero if `earlier` is later than `self`.
    pub fn duration_since(&self, earlier: SimTime) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }

    pub fn saturating_add(&self, other: SimTime) -> Self {
        SimTime(self.0.saturating_add(other.0))
    }
}

impl Add<SimTime> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimTime) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub<SimTime> for SimTime {
    type Output = Duration;

    fn sub(self, rhs: SimTime) -> Self::Output {
        self.duration_since(rhs)
    }
}

impl Default for SimTime {
    fn default() -> Self {
        SimTime::zero()
    }
}

impl From<f64> for SimTime {
    /// Convert from model time units (as f64) to SimTime.
    ///
    /// # Examples
    /// ```
    /// # use till_core::SimTime;
    /// let time = SimTime::from(1.5);
    /// assert_eq!(time.as_nanos(), 1_500_000_000);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the input is negative, infinite, NaN or too large. Use
    /// [`SimTime::saturating_from_secs_f64`] for sampled values.
    fn from(secs: f64) -> Self {
        if !secs.is_finite() {
            panic!("SimTime cannot be created from non-finite value: {secs}");
        }
        if secs < 0.0 {
            panic!("SimTime cannot be negative: {secs}");
        }
        const MAX_SECS: f64 = (u64::MAX as f64) / NANOS_PER_UNIT;
        if secs >= MAX_SECS {
            panic!("SimTime value too large: {secs} (max: {MAX_SECS})");
        }
        SimTime::from_nanos((secs * NANOS_PER_UNIT).round() as u64)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}", self.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simtime_creation() {
        assert_eq!(SimTime::zero().as_nanos(), 0);
        assert_eq!(SimTime::from_nanos(1000).as_nanos(), 1000);
        assert_eq!(SimTime::from_millis(1).as_nanos(), 1_000_000);
        assert_eq!(SimTime::from_secs(1).as_nanos(), 1_000_000_000);
    }

    #[test]
    fn test_simtime_arithmetic() {
        let t1 = SimTime::from_millis(100);
        let t2 = SimTime::from_millis(50);

        assert_eq!(t1 + t2, SimTime::from_millis(150));
        assert_eq!(t1 - t2, Duration::from_millis(50));
        assert_eq!(t2 - t1, Duration::ZERO);
        assert_eq!(SimTime::MAX + SimTime::from_secs(1), SimTime::MAX);
    }

    #[test]
    fn test_simtime_from_f64() {
        assert_eq!(SimTime::from(1.0).as_nanos(), 1_000_000_000);
        assert_eq!(SimTime::from(0.5).as_nanos(), 500_000_000);
        assert_eq!(SimTime::from(5.0).as_secs_f64(), 5.0);
    }

    #[test]
    fn test_saturating_conversion_clamps() {
        assert_eq!(SimTime::saturating_from_secs_f64(-3.2), SimTime::zero());
        assert_eq!(SimTime::saturating_from_secs_f64(f64::NAN), SimTime::zero());
        assert_eq!(SimTime::saturating_from_secs_f64(f64::INFINITY), SimTime::MAX);
        assert_eq!(
            SimTime::saturating_from_secs_f64(2.25),
            SimTime::from_nanos(2_250_000_000)
        );
    }

    #[test]
    fn test_saturating_conversion_rounds_to_nearest_tick() {
        assert_eq!(SimTime::saturating_from_secs_f64(0.4e-9), SimTime::zero());
        assert_eq!(SimTime::saturating_from_secs_f64(0.6e-9), SimTime::from_nanos(1));
        assert_eq!(
            SimTime::saturating_from_secs_f64(1.0 - 0.4e-9),
            SimTime::from_secs(1)
        );
        assert_eq!(SimTime::saturating_from_secs_f64(3.7e-9), SimTime::from_nanos(4));
    }

    #[test]
    #[should_panic(expected = "SimTime cannot be negative")]
    fn test_simtime_from_negative_f64() {
        let _ = SimTime::from(-1.0);
    }

    #[test]
    #[should_panic(expected = "SimTime cannot be created from non-finite value")]
    fn test_simtime_from_nan_f64() {
        let _ = SimTime::from(f64::NAN);
    }

    #[test]
    fn test_display() {
        assert_eq!(SimTime::from(12.5).to_string(), "t=12.500");
    }
}
