//! Arrival generator
//!
//! A single long-lived process that sleeps for one inter-arrival gap at a
//! time and spawns a customer each time it wakes up. The first customer
//! arrives after the first gap, not at time zero.

use till_core::{
    ArrivalPattern, Context, DistributionError, PoissonArrivals, ProcessId, ProcessStatus,
    ScriptedArrivals, SimError, SimTime,
};
use tracing::debug;

use crate::config::{ArrivalMode, StoreConfig};
use crate::customer::CustomerProcess;
use crate::store::{StoreEvent, StoreProcess};

pub struct ArrivalGenerator {
    pattern: Box<dyn ArrivalPattern>,
    spawned: u64,
}

impl ArrivalGenerator {
    pub fn new(pattern: Box<dyn ArrivalPattern>) -> Self {
        Self {
            pattern,
            spawned: 0,
        }
    }

    /// Generator for the configured arrival mode.
    pub fn from_config(config: &StoreConfig) -> Result<Self, DistributionError> {
        let pattern: Box<dyn ArrivalPattern> = match &config.arrivals {
            ArrivalMode::Poisson => Box::new(PoissonArrivals::new(config.arrival_rate)?),
            ArrivalMode::Scripted { times } => Box::new(ScriptedArrivals::new(times.clone())),
        };
        Ok(Self::new(pattern))
    }

    pub(crate) fn resume(
        &mut self,
        self_id: ProcessId,
        event: StoreEvent,
        ctx: &mut Context<'_, StoreProcess>,
    ) -> Result<ProcessStatus, SimError> {
        match event {
            StoreEvent::Start => {}
            StoreEvent::Timeout => self.spawn_customer(ctx),
            StoreEvent::Granted(_) => {
                return Err(SimError::UnexpectedEvent {
                    id: self_id,
                    state: "generating arrivals".to_string(),
                    event: format!("{event:?}"),
                })
            }
        }

        // Drawn before the new customer's start event runs.
        match self.pattern.next_gap(&mut ctx.world().variates) {
            Some(gap) => {
                ctx.sleep(self_id, SimTime::saturating_from_secs_f64(gap), StoreEvent::Timeout);
                Ok(ProcessStatus::Suspended)
            }
            None => {
                debug!(spawned = self.spawned, "Arrival script exhausted");
                Ok(ProcessStatus::Terminated)
            }
        }
    }

    fn spawn_customer(&mut self, ctx: &mut Context<'_, StoreProcess>) {
        let now = ctx.now();
        let id = ctx.world().next_customer_id();
        let pid = ctx.spawn(StoreProcess::Customer(CustomerProcess::new(id, now)));
        ctx.schedule_now(pid, StoreEvent::Start);
        self.spawned += 1;
        debug!(customer = %id, process = %pid, time = %now, "Customer arrived");
    }
}
