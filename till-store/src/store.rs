//! The store world and its processes

use till_components::{Grant, ResourceError, ResourcePool};
use till_core::{
    ClampedNormal, Context, DistributionError, DurationDistribution, Process, ProcessId,
    ProcessStatus, RandomVariateSource, SimError,
};

use crate::arrivals::ArrivalGenerator;
use crate::config::StoreConfig;
use crate::customer::CustomerProcess;
use crate::record::{CheckoutType, CustomerId, RecordSink};

/// Events delivered to store processes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreEvent {
    /// First wake-up of a freshly spawned process.
    Start,
    /// A sleep the process scheduled for itself has elapsed.
    Timeout,
    /// A checkout slot was handed over after waiting in line.
    Granted(Grant),
}

impl From<Grant> for StoreEvent {
    fn from(grant: Grant) -> Self {
        StoreEvent::Granted(grant)
    }
}

/// Every kind of process that lives in the store.
pub enum StoreProcess {
    Arrivals(ArrivalGenerator),
    Customer(CustomerProcess),
}

impl StoreProcess {
    pub fn as_customer(&self) -> Option<&CustomerProcess> {
        match self {
            StoreProcess::Customer(customer) => Some(customer),
            StoreProcess::Arrivals(_) => None,
        }
    }
}

impl Process for StoreProcess {
    type Event = StoreEvent;
    type World = Store;

    fn resume(
        &mut self,
        self_id: ProcessId,
        event: StoreEvent,
        ctx: &mut Context<'_, Self>,
    ) -> Result<ProcessStatus, SimError> {
        match self {
            StoreProcess::Arrivals(generator) => generator.resume(self_id, event, ctx),
            StoreProcess::Customer(customer) => customer.resume(self_id, event, ctx),
        }
    }
}

/// Running totals kept while customers move through the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounters {
    pub arrived: u64,
    pub routed_cashier: u64,
    pub routed_self_checkout: u64,
}

/// Shared state of one store run: checkouts, random source and output.
pub struct Store {
    cashier: ResourcePool,
    self_checkout: ResourcePool,
    pub(crate) variates: RandomVariateSource,
    pub(crate) shopping: ClampedNormal,
    cashier_service: ClampedNormal,
    self_checkout_service: ClampedNormal,
    cashier_share: f64,
    pub(crate) records: RecordSink,
    counters: StoreCounters,
}

impl Store {
    pub fn new(config: &StoreConfig) -> Result<Self, DistributionError> {
        Ok(Self {
            cashier: ResourcePool::new("cashier", config.cashier.capacity),
            self_checkout: ResourcePool::new("self_checkout", config.self_checkout.capacity),
            variates: RandomVariateSource::new(config.seed),
            shopping: ClampedNormal::new(config.shopping.mean, config.shopping.std)?,
            cashier_service: ClampedNormal::new(
                config.cashier.service.mean,
                config.cashier.service.std,
            )?,
            self_checkout_service: ClampedNormal::new(
                config.self_checkout.service.mean,
                config.self_checkout.service.std,
            )?,
            cashier_share: config.cashier_share,
            records: RecordSink::new(),
            counters: StoreCounters::default(),
        })
    }

    pub fn pool(&self, checkout: CheckoutType) -> &ResourcePool {
        match checkout {
            CheckoutType::Cashier => &self.cashier,
            CheckoutType::SelfCheckout => &self.self_checkout,
        }
    }

    pub fn pool_mut(&mut self, checkout: CheckoutType) -> &mut ResourcePool {
        match checkout {
            CheckoutType::Cashier => &mut self.cashier,
            CheckoutType::SelfCheckout => &mut self.self_checkout,
        }
    }

    pub fn records(&self) -> &RecordSink {
        &self.records
    }

    pub fn counters(&self) -> &StoreCounters {
        &self.counters
    }

    /// Checks both checkout pools.
    pub fn check_invariants(&self) -> Result<(), ResourceError> {
        self.cashier.check_invariants()?;
        self.self_checkout.check_invariants()
    }

    pub(crate) fn into_records(self) -> RecordSink {
        self.records
    }

    pub(crate) fn next_customer_id(&mut self) -> CustomerId {
        let id = CustomerId(self.counters.arrived);
        self.counters.arrived += 1;
        id
    }

    /// Picks a checkout with one uniform draw.
    pub(crate) fn route(&mut self) -> CheckoutType {
        if self.variates.uniform() < self.cashier_share {
            self.counters.routed_cashier += 1;
            CheckoutType::Cashier
        } else {
            self.counters.routed_self_checkout += 1;
            CheckoutType::SelfCheckout
        }
    }

    pub(crate) fn sample_service(&mut self, checkout: CheckoutType) -> f64 {
        match checkout {
            CheckoutType::Cashier => self.cashier_service.sample(&mut self.variates),
            CheckoutType::SelfCheckout => self.self_checkout_service.sample(&mut self.variates),
        }
    }
}
