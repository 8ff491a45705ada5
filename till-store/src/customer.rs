//! Customer lifecycle
//!
//! A customer walks through `Arrived → Shopping → Queueing → InService →
//! Departed` and never skips a stage. A customer served on arrival at the
//! checkout still joins the line, for a wait of zero. Each state carries what
//! has been learned so far, so the transaction record can be written on
//! departure without any side bookkeeping.
//!
//! Recorded durations are the ones the clock advanced by, that is, the
//! sampled value rounded to the clock tick.

use serde::{Deserialize, Serialize};
use till_components::{Acquire, GrantToken};
use till_core::{Context, DurationDistribution, ProcessId, ProcessStatus, SimError, SimTime};
use tracing::{debug, trace};

use crate::record::{CheckoutType, CustomerId, TransactionRecord};
use crate::store::{StoreEvent, StoreProcess};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CustomerState {
    /// Spawned; waiting for its start event.
    Arrived,
    Shopping {
        shopping: f64,
    },
    Queueing {
        shopping: f64,
        checkout: CheckoutType,
        joined_at: SimTime,
    },
    InService {
        shopping: f64,
        checkout: CheckoutType,
        wait: f64,
        service: f64,
        token: GrantToken,
    },
    Departed,
}

impl CustomerState {
    pub fn stage(&self) -> CustomerStage {
        match self {
            CustomerState::Arrived => CustomerStage::Arrived,
            CustomerState::Shopping { .. } => CustomerStage::Shopping,
            CustomerState::Queueing { .. } => CustomerStage::Queueing,
            CustomerState::InService { .. } => CustomerStage::InService,
            CustomerState::Departed => CustomerStage::Departed,
        }
    }
}

/// [`CustomerState`] without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerStage {
    Arrived,
    Shopping,
    Queueing,
    InService,
    Departed,
}

impl CustomerStage {
    /// The only stage a customer may move to from this one.
    pub fn next(self) -> Option<CustomerStage> {
        match self {
            CustomerStage::Arrived => Some(CustomerStage::Shopping),
            CustomerStage::Shopping => Some(CustomerStage::Queueing),
            CustomerStage::Queueing => Some(CustomerStage::InService),
            CustomerStage::InService => Some(CustomerStage::Departed),
            CustomerStage::Departed => None,
        }
    }
}

/// Snapshot of a customer still in the store when the run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InProgressCustomer {
    pub customer: CustomerId,
    pub arrived_at: f64,
    pub stage: CustomerStage,
    pub shopping_duration: Option<f64>,
    pub checkout: Option<CheckoutType>,
    /// Time spent in line: so far if still queueing, in full if in service.
    pub queue_wait_duration: Option<f64>,
    pub service_duration: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CustomerProcess {
    id: CustomerId,
    arrived_at: SimTime,
    state: CustomerState,
}

impl CustomerProcess {
    pub fn new(id: CustomerId, arrived_at: SimTime) -> Self {
        Self {
            id,
            arrived_at,
            state: CustomerState::Arrived,
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn arrived_at(&self) -> SimTime {
        self.arrived_at
    }

    pub fn state(&self) -> &CustomerState {
        &self.state
    }

    pub(crate) fn resume(
        &mut self,
        self_id: ProcessId,
        event: StoreEvent,
        ctx: &mut Context<'_, StoreProcess>,
    ) -> Result<ProcessStatus, SimError> {
        let now = ctx.now();
        match (self.state, event) {
            (CustomerState::Arrived, StoreEvent::Start) => {
                let store = ctx.world();
                let delay = SimTime::saturating_from_secs_f64(
                    store.shopping.sample(&mut store.variates),
                );
                self.transition(CustomerState::Shopping {
                    shopping: delay.as_secs_f64(),
                });
                ctx.sleep(self_id, delay, StoreEvent::Timeout);
                Ok(ProcessStatus::Suspended)
            }
            (CustomerState::Shopping { shopping }, StoreEvent::Timeout) => {
                let store = ctx.world();
                let checkout = store.route();
                let acquired = store.pool_mut(checkout).acquire(self_id, now);
                self.transition(CustomerState::Queueing {
                    shopping,
                    checkout,
                    joined_at: now,
                });
                match acquired {
                    Acquire::Granted(token) => {
                        self.start_service(self_id, shopping, checkout, now, token, ctx)
                    }
                    Acquire::Queued { position } => {
                        debug!(customer = %self.id, checkout = %checkout, position, "Joined checkout line");
                        Ok(ProcessStatus::Suspended)
                    }
                }
            }
            (
                CustomerState::Queueing {
                    shopping,
                    checkout,
                    joined_at,
                },
                StoreEvent::Granted(grant),
            ) => {
                debug_assert_eq!(grant.queued_at, joined_at);
                self.start_service(self_id, shopping, checkout, joined_at, grant.token, ctx)
            }
            (
                CustomerState::InService {
                    shopping,
                    checkout,
                    wait,
                    service,
                    token,
                },
                StoreEvent::Timeout,
            ) => {
                let (store, scheduler) = ctx.parts();
                store.pool_mut(checkout).release(token, scheduler)?;
                store.records.push(TransactionRecord {
                    customer: self.id,
                    completed_at: now.as_secs_f64(),
                    shopping_duration: shopping,
                    queue_wait_duration: wait,
                    service_duration: service,
                    checkout,
                });
                self.transition(CustomerState::Departed);
                Ok(ProcessStatus::Terminated)
            }
            (state, event) => Err(SimError::UnexpectedEvent {
                id: self_id,
                state: format!("{state:?}"),
                event: format!("{event:?}"),
            }),
        }
    }

    fn start_service(
        &mut self,
        self_id: ProcessId,
        shopping: f64,
        checkout: CheckoutType,
        joined_at: SimTime,
        token: GrantToken,
        ctx: &mut Context<'_, StoreProcess>,
    ) -> Result<ProcessStatus, SimError> {
        let wait = ctx.now().duration_since(joined_at).as_secs_f64();
        let delay = SimTime::saturating_from_secs_f64(ctx.world().sample_service(checkout));
        self.transition(CustomerState::InService {
            shopping,
            checkout,
            wait,
            service: delay.as_secs_f64(),
            token,
        });
        ctx.sleep(self_id, delay, StoreEvent::Timeout);
        Ok(ProcessStatus::Suspended)
    }

    fn transition(&mut self, next: CustomerState) {
        debug_assert_eq!(
            self.state.stage().next(),
            Some(next.stage()),
            "{} skipped a stage",
            self.id
        );
        trace!(customer = %self.id, from = ?self.state.stage(), to = ?next.stage(), "Customer state change");
        self.state = next;
    }

    /// What this customer had done by `at`, for runs that report customers
    /// cut off by the horizon.
    pub fn snapshot(&self, at: SimTime) -> InProgressCustomer {
        let mut snapshot = InProgressCustomer {
            customer: self.id,
            arrived_at: self.arrived_at.as_secs_f64(),
            stage: self.state.stage(),
            shopping_duration: None,
            checkout: None,
            queue_wait_duration: None,
            service_duration: None,
        };
        match self.state {
            CustomerState::Arrived | CustomerState::Departed => {}
            CustomerState::Shopping { shopping } => {
                snapshot.shopping_duration = Some(shopping);
            }
            CustomerState::Queueing {
                shopping,
                checkout,
                joined_at,
            } => {
                snapshot.shopping_duration = Some(shopping);
                snapshot.checkout = Some(checkout);
                snapshot.queue_wait_duration = Some(at.duration_since(joined_at).as_secs_f64());
            }
            CustomerState::InService {
                shopping,
                checkout,
                wait,
                service,
                ..
            } => {
                snapshot.shopping_duration = Some(shopping);
                snapshot.checkout = Some(checkout);
                snapshot.queue_wait_duration = Some(wait);
                snapshot.service_duration = Some(service);
            }
        }
        snapshot
    }
}
