//! Run entry points: one store day, or a sweep over arrival rates

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use till_components::{ResourcePool, Validate};
use till_core::logging::{events, simulation_span};
use till_core::{Executor, SimError, SimTime, Simulation};
use tracing::{info, instrument};

use crate::arrivals::ArrivalGenerator;
use crate::config::{HorizonPolicy, StoreConfig};
use crate::customer::InProgressCustomer;
use crate::error::StoreError;
use crate::record::{CheckoutType, TransactionRecord};
use crate::store::{Store, StoreEvent, StoreProcess};

const SIMULATION_NAME: &str = "store";

/// End-of-run state of one checkout pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolReport {
    pub capacity: usize,
    pub granted: u64,
    pub peak_queue_len: usize,
    /// Customers still in line at the horizon.
    pub waiting: usize,
    /// Customers still being served at the horizon.
    pub in_service: usize,
    /// Mean fraction of servers busy over the run.
    pub utilization: f64,
}

impl PoolReport {
    fn from_pool(pool: &ResourcePool, horizon: SimTime) -> Self {
        Self {
            capacity: pool.capacity(),
            granted: pool.stats().total_granted(),
            peak_queue_len: pool.stats().peak_queue_len,
            waiting: pool.queue_len(),
            in_service: pool.in_service(),
            utilization: pool.utilization(horizon),
        }
    }
}

/// Counters describing one run. Times are in model time units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: u64,
    pub arrival_rate: f64,
    pub horizon: f64,
    /// Time of the last processed event.
    pub final_time: f64,
    pub events_processed: u64,
    pub customers_arrived: u64,
    pub routed_cashier: u64,
    pub routed_self_checkout: u64,
    pub completed: usize,
    /// Customers still in the store at the horizon, whatever the policy.
    pub in_progress: usize,
    pub cashier: PoolReport,
    pub self_checkout: PoolReport,
}

impl RunReport {
    pub fn pool(&self, checkout: CheckoutType) -> &PoolReport {
        match checkout {
            CheckoutType::Cashier => &self.cashier,
            CheckoutType::SelfCheckout => &self.self_checkout,
        }
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    /// Completed transactions in completion order.
    pub records: Vec<TransactionRecord>,
    pub report: RunReport,
    /// Filled only under [`HorizonPolicy::ReportInProgress`].
    pub in_progress: Vec<InProgressCustomer>,
}

/// One run of an arrival-rate sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRun {
    pub arrival_rate: f64,
    pub output: RunOutput,
}

pub fn horizon(config: &StoreConfig) -> SimTime {
    SimTime::saturating_from_secs_f64(config.horizon)
}

/// Validates `config` and sets up a store whose arrival generator starts at
/// time zero. Nothing has run yet.
///
/// Use this with [`finish`] to drive the run with a custom executor.
pub fn build_simulation(config: &StoreConfig) -> Result<Simulation<StoreProcess>, StoreError> {
    config.validate()?;
    let store = Store::new(config).map_err(SimError::from)?;
    let generator = ArrivalGenerator::from_config(config).map_err(SimError::from)?;

    let mut sim = Simulation::new(store);
    let id = sim.spawn(StoreProcess::Arrivals(generator));
    sim.schedule(SimTime::zero(), id, StoreEvent::Start);
    Ok(sim)
}

/// Collects the output of a run that has stopped.
pub fn finish(sim: Simulation<StoreProcess>, config: &StoreConfig) -> RunOutput {
    let horizon = horizon(config);
    let customers: Vec<InProgressCustomer> = sim
        .processes()
        .iter_live()
        .filter_map(|(_, process)| process.as_customer())
        .map(|customer| customer.snapshot(horizon))
        .collect();

    let store = sim.world();
    let counters = store.counters();
    let report = RunReport {
        seed: config.seed,
        arrival_rate: config.arrival_rate,
        horizon: config.horizon,
        final_time: sim.time().as_secs_f64(),
        events_processed: sim.events_processed(),
        customers_arrived: counters.arrived,
        routed_cashier: counters.routed_cashier,
        routed_self_checkout: counters.routed_self_checkout,
        completed: store.records().len(),
        in_progress: customers.len(),
        cashier: PoolReport::from_pool(store.pool(CheckoutType::Cashier), horizon),
        self_checkout: PoolReport::from_pool(store.pool(CheckoutType::SelfCheckout), horizon),
    };
    events::cut_off_at_horizon(SIMULATION_NAME, horizon, customers.len());
    events::simulation_completed(SIMULATION_NAME, sim.time(), sim.events_processed());

    let in_progress = match config.horizon_policy {
        HorizonPolicy::Discard => Vec::new(),
        HorizonPolicy::ReportInProgress => customers,
    };
    let (store, _) = sim.into_parts();
    RunOutput {
        records: store.into_records().into_records(),
        report,
        in_progress,
    }
}

/// Runs one store day up to the configured horizon.
///
/// # Errors
///
/// [`StoreError::Config`] if the configuration is invalid (nothing is run),
/// [`StoreError::Simulation`] if an internal invariant broke mid-run.
pub fn run_simulation(config: &StoreConfig) -> Result<RunOutput, StoreError> {
    let _span = simulation_span(SIMULATION_NAME, config.seed).entered();
    let mut sim = build_simulation(config)?;
    let horizon = horizon(config);
    info!(arrival_rate = config.arrival_rate, "Store opens");
    events::simulation_started(SIMULATION_NAME, Some(horizon));
    sim.execute(Executor::timed(horizon))?;
    Ok(finish(sim, config))
}

/// Runs `config` once per arrival rate, in parallel.
///
/// Runs share nothing but the configuration, and every run uses the same
/// seed. Results come back in the order of `rates`.
#[instrument(skip(config, rates), fields(seed = config.seed))]
pub fn sweep_arrival_rates(
    config: &StoreConfig,
    rates: &[f64],
) -> Result<Vec<SweepRun>, StoreError> {
    info!(runs = rates.len(), "Starting arrival rate sweep");
    rates
        .par_iter()
        .map(|&arrival_rate| {
            run_simulation(&config.with_arrival_rate(arrival_rate)).map(|output| SweepRun {
                arrival_rate,
                output,
            })
        })
        .collect()
}
