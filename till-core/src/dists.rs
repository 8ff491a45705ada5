//! Seeded random variates, arrival patterns and duration distributions
//!
//! Every draw of a run goes through one [`RandomVariateSource`] owned by that
//! run. Two sources built from the same seed produce identical sequences, and
//! nothing here touches global or thread-local random state, so independent
//! runs can execute side by side.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal};

use crate::error::DistributionError;

/// Seeded, reproducible generator of exponential, normal and uniform variates.
#[derive(Debug, Clone)]
pub struct RandomVariateSource {
    seed: u64,
    rng: StdRng,
    draws: u64,
}

impl RandomVariateSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            draws: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of variates drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Samples an exponential variate with the given rate (mean `1 / rate`).
    pub fn exponential(&mut self, rate: f64) -> Result<f64, DistributionError> {
        let dist = exponential_dist(rate)?;
        Ok(self.sample(&dist))
    }

    /// Samples a normal variate. May be negative.
    pub fn normal(&mut self, mean: f64, std: f64) -> Result<f64, DistributionError> {
        let dist = normal_dist(mean, std)?;
        Ok(self.sample(&dist))
    }

    /// Samples a normal variate floored at zero.
    ///
    /// Negative draws are clamped, never resampled, which pulls the realised
    /// mean above `mean` when `std` is large relative to it.
    pub fn clamped_normal(&mut self, mean: f64, std: f64) -> Result<f64, DistributionError> {
        Ok(self.normal(mean, std)?.max(0.0))
    }

    /// Samples a uniform variate in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.draws += 1;
        self.rng.gen::<f64>()
    }

    /// Samples any `f64` distribution from this source.
    pub fn sample<D: Distribution<f64>>(&mut self, dist: &D) -> f64 {
        self.draws += 1;
        self.rng.sample(dist)
    }
}

fn exponential_dist(rate: f64) -> Result<Exp<f64>, DistributionError> {
    if !(rate.is_finite() && rate > 0.0) {
        return Err(DistributionError::InvalidRate { rate });
    }
    Exp::new(rate).map_err(|_| DistributionError::InvalidRate { rate })
}

fn normal_dist(mean: f64, std: f64) -> Result<Normal<f64>, DistributionError> {
    if !mean.is_finite() {
        return Err(DistributionError::InvalidMean { mean });
    }
    if !(std.is_finite() && std >= 0.0) {
        return Err(DistributionError::InvalidStdDev { std });
    }
    Normal::new(mean, std).map_err(|_| DistributionError::InvalidStdDev { std })
}

/// Source of durations, in model time units.
pub trait DurationDistribution {
    fn sample(&self, source: &mut RandomVariateSource) -> f64;
}

/// Normal distribution whose negative draws are floored at zero.
#[derive(Debug, Clone, Copy)]
pub struct ClampedNormal {
    normal: Normal<f64>,
}

impl ClampedNormal {
    pub fn new(mean: f64, std: f64) -> Result<Self, DistributionError> {
        Ok(Self {
            normal: normal_dist(mean, std)?,
        })
    }
}

impl DurationDistribution for ClampedNormal {
    fn sample(&self, source: &mut RandomVariateSource) -> f64 {
        source.sample(&self.normal).max(0.0)
    }
}

/// Generates the gaps between consecutive arrivals.
pub trait ArrivalPattern {
    /// Time until the next arrival, or `None` once the pattern is exhausted.
    fn next_gap(&mut self, source: &mut RandomVariateSource) -> Option<f64>;
}

/// Poisson process: exponentially distributed inter-arrival gaps.
#[derive(Debug, Clone, Copy)]
pub struct PoissonArrivals {
    exp: Exp<f64>,
}

impl PoissonArrivals {
    /// `rate` is the expected number of arrivals per model time unit.
    pub fn new(rate: f64) -> Result<Self, DistributionError> {
        Ok(Self {
            exp: exponential_dist(rate)?,
        })
    }
}

impl ArrivalPattern for PoissonArrivals {
    fn next_gap(&mut self, source: &mut RandomVariateSource) -> Option<f64> {
        Some(source.sample(&self.exp))
    }
}

/// Arrivals at fixed absolute times. Draws nothing from the source.
#[derive(Debug, Clone)]
pub struct ScriptedArrivals {
    times: Vec<f64>,
    next: usize,
    last: f64,
}

impl ScriptedArrivals {
    /// `times` must be non-decreasing; a time earlier than its predecessor
    /// arrives together with it.
    pub fn new(times: Vec<f64>) -> Self {
        Self {
            times,
            next: 0,
            last: 0.0,
        }
    }
}

impl ArrivalPattern for ScriptedArrivals {
    fn next_gap(&mut self, _source: &mut RandomVariateSource) -> Option<f64> {
        let time = *self.times.get(self.next)?;
        self.next += 1;
        let gap = (time - self.last).max(0.0);
        self.last = self.last.max(time);
        Some(gap)
    }
}
