//! Store run configuration
//!
//! All times are in model time units (minutes in the default scenario). The
//! configuration is plain data: build it with [`StoreConfig::default`] and the
//! `with_*` setters, or load it from JSON, and it is validated before a run
//! schedules anything.

use serde::{Deserialize, Serialize};
use till_components::{
    validate_finite, validate_non_negative, validate_positive, validate_range, Validate,
    ValidationError, ValidationResult,
};
use tracing::debug;

use crate::error::StoreError;

/// Longest accepted horizon. Every instant up to it stays strictly below
/// `SimTime::MAX`, so a wake-up that saturates the clock always lands past
/// the horizon.
pub const MAX_HORIZON: f64 = 1.0e10;

/// Highest accepted arrival rate: a mean gap of at least a thousand clock
/// ticks, so rounding gaps to the tick leaves the arrival process Poisson.
pub const MAX_ARRIVAL_RATE: f64 = 1.0e6;

/// Mean and standard deviation of a duration; draws are floored at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationParams {
    pub mean: f64,
    pub std: f64,
}

impl DurationParams {
    pub const fn new(mean: f64, std: f64) -> Self {
        Self { mean, std }
    }

    /// Always takes exactly `value`.
    pub const fn fixed(value: f64) -> Self {
        Self::new(value, 0.0)
    }

    fn validate(&self, field: &str) -> ValidationResult<()> {
        validate_finite(&format!("{field}.mean"), self.mean)?;
        validate_finite(&format!("{field}.std"), self.std)?;
        validate_non_negative(&format!("{field}.std"), self.std)
    }
}

/// One kind of checkout: how many parallel servers and how long service takes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    pub capacity: usize,
    pub service: DurationParams,
}

impl CheckoutConfig {
    pub const fn new(capacity: usize, service: DurationParams) -> Self {
        Self { capacity, service }
    }
}

/// Where arrival times come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArrivalMode {
    /// Exponential gaps with mean `1 / arrival_rate`.
    Poisson,
    /// Customers arrive at exactly these absolute times, then no more.
    Scripted { times: Vec<f64> },
}

/// What happens to customers still in the store when the horizon is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizonPolicy {
    /// Drop them silently; only completed transactions are reported.
    #[default]
    Discard,
    /// Also report a snapshot of each one. No transaction record is made up
    /// for them.
    ReportInProgress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Length of the run; events due after it are not processed.
    pub horizon: f64,
    /// Expected arrivals per time unit, for [`ArrivalMode::Poisson`].
    pub arrival_rate: f64,
    pub shopping: DurationParams,
    pub cashier: CheckoutConfig,
    pub self_checkout: CheckoutConfig,
    /// Probability that a customer picks the cashier line.
    pub cashier_share: f64,
    pub arrivals: ArrivalMode,
    pub horizon_policy: HorizonPolicy,
    pub seed: u64,
}

impl Default for StoreConfig {
    /// An 8-hour day: one cashier, two self-checkout terminals and a shopper
    /// every five minutes on average.
    fn default() -> Self {
        Self {
            horizon: 480.0,
            arrival_rate: 1.0 / 5.0,
            shopping: DurationParams::new(20.0, 5.0),
            cashier: CheckoutConfig::new(1, DurationParams::new(5.0, 2.0)),
            self_checkout: CheckoutConfig::new(2, DurationParams::new(8.0, 3.0)),
            cashier_share: 0.6,
            arrivals: ArrivalMode::Poisson,
            horizon_policy: HorizonPolicy::Discard,
            seed: 42,
        }
    }
}

impl StoreConfig {
    /// Parses a configuration from JSON and validates it. Missing fields take
    /// their default values.
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let config: StoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        debug!(seed = config.seed, horizon = config.horizon, "Loaded store configuration");
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Copy of this configuration with a different arrival rate, for sweeps.
    #[must_use]
    pub fn with_arrival_rate(&self, rate: f64) -> Self {
        Self {
            arrival_rate: rate,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    #[must_use]
    pub fn with_shopping(mut self, shopping: DurationParams) -> Self {
        self.shopping = shopping;
        self
    }

    #[must_use]
    pub fn with_cashier(mut self, cashier: CheckoutConfig) -> Self {
        self.cashier = cashier;
        self
    }

    #[must_use]
    pub fn with_self_checkout(mut self, self_checkout: CheckoutConfig) -> Self {
        self.self_checkout = self_checkout;
        self
    }

    #[must_use]
    pub fn with_cashier_share(mut self, share: f64) -> Self {
        self.cashier_share = share;
        self
    }

    #[must_use]
    pub fn with_scripted_arrivals(mut self, times: Vec<f64>) -> Self {
        self.arrivals = ArrivalMode::Scripted { times };
        self
    }

    #[must_use]
    pub fn with_horizon_policy(mut self, policy: HorizonPolicy) -> Self {
        self.horizon_policy = policy;
        self
    }
}

impl Validate for StoreConfig {
    fn validate(&self) -> ValidationResult<()> {
        validate_finite("horizon", self.horizon)?;
        validate_positive("horizon", self.horizon)?;
        validate_range("horizon", self.horizon, 0.0, MAX_HORIZON)?;
        validate_finite("arrival_rate", self.arrival_rate)?;
        validate_positive("arrival_rate", self.arrival_rate)?;
        validate_range("arrival_rate", self.arrival_rate, 0.0, MAX_ARRIVAL_RATE)?;

        self.shopping.validate("shopping")?;
        self.cashier.service.validate("cashier.service")?;
        self.self_checkout.service.validate("self_checkout.service")?;

        if self.cashier.capacity == 0 && self.self_checkout.capacity == 0 {
            return Err(ValidationError::ConstraintViolation {
                field: "cashier.capacity".to_string(),
                constraint: "non-zero when self_checkout.capacity is 0".to_string(),
            });
        }

        validate_range("cashier_share", self.cashier_share, 0.0, 1.0)?;

        if let ArrivalMode::Scripted { times } = &self.arrivals {
            let mut previous = 0.0;
            for (i, &time) in times.iter().enumerate() {
                let field = format!("arrivals.times[{i}]");
                validate_finite(&field, time)?;
                validate_non_negative(&field, time)?;
                if time < previous {
                    return Err(ValidationError::InvalidValue {
                        field,
                        reason: format!("{time} is earlier than the previous arrival {previous}"),
                    });
                }
                previous = time;
            }
        }
        Ok(())
    }
}
