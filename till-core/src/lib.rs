//! Core discrete event simulation engine.
//!
//! This crate provides the building blocks for a discrete event simulation:
//! a virtual clock, a deterministic event scheduler, an arena of processes
//! written as explicit state machines, and a seeded source of random variates.
//!
//! # Architecture Overview
//!
//! - [`Simulation`] owns the [`Scheduler`], the [`ProcessTable`] and the
//!   shared model state (the *world*). It pops one event at a time, advances
//!   the clock to the event's time and resumes exactly the process the event
//!   is addressed to.
//! - A [`Process`] runs until its next suspension point and then returns. It
//!   suspends by scheduling the event it waits for: a timer on itself, or a
//!   grant that some other part of the model will deliver later.
//! - [`Executor`] decides when to stop, typically at a horizon.
//!
//! # Basic Usage
//!
//! ```rust
//! use till_core::{Context, Executor, Process, ProcessId, ProcessStatus, SimError, SimTime, Simulation};
//!
//! struct Blinker;
//!
//! impl Process for Blinker {
//!     type Event = ();
//!     type World = u32;
//!
//!     fn resume(&mut self, id: ProcessId, _: (), ctx: &mut Context<'_, Self>) -> Result<ProcessStatus, SimError> {
//!         *ctx.world() += 1;
//!         ctx.sleep(id, SimTime::from_secs(1), ());
//!         Ok(ProcessStatus::Suspended)
//!     }
//! }
//!
//! let mut sim = Simulation::new(0u32);
//! let id = sim.spawn(Blinker);
//! sim.schedule(SimTime::zero(), id, ());
//! sim.execute(Executor::timed(SimTime::from_secs(3))).unwrap();
//! assert_eq!(*sim.world(), 4);
//! ```
//!
//! # Time Model
//!
//! All timing uses [`SimTime`], which represents simulation time (not wall-clock time).
//! Events due at the same instant are delivered in the order they were
//! scheduled, so a run is fully determined by its inputs and seed.

pub mod dists;
pub mod error;
pub mod execute;
pub mod logging;
pub mod process;
pub mod scheduler;
pub mod time;
pub mod types;

use tracing::{debug, error, info, instrument, trace};

pub use dists::{
    ArrivalPattern, ClampedNormal, DurationDistribution, PoissonArrivals, RandomVariateSource,
    ScriptedArrivals,
};
pub use error::{DistributionError, EventError, SimError};
pub use execute::{Execute, Executor, ExecutorWithSideEffect};
pub use logging::{
    init_detailed_simulation_logging, init_simulation_logging, init_simulation_logging_with_level,
    simulation_span,
};
pub use process::{Context, Process, ProcessStatus, ProcessTable};
pub use scheduler::{ClockRef, EventEntry, Scheduler};
pub use time::SimTime;
pub use types::{EventId, ProcessId};

/// Simulation struct that puts the scheduler, the processes and the world together.
///
/// See the [crate-level documentation](index.html) for more information.
pub struct Simulation<P: Process> {
    scheduler: Scheduler<P::Event>,
    processes: ProcessTable<P>,
    world: P::World,
    events_processed: u64,
}

impl<P: Process> Simulation<P> {
    pub fn new(world: P::World) -> Self {
        Self {
            scheduler: Scheduler::default(),
            processes: ProcessTable::default(),
            world,
            events_processed: 0,
        }
    }

    #[must_use]
    pub fn time(&self) -> SimTime {
        self.scheduler.time()
    }

    pub fn clock(&self) -> ClockRef {
        self.scheduler.clock()
    }

    pub fn world(&self) -> &P::World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut P::World {
        &mut self.world
    }

    pub fn processes(&self) -> &ProcessTable<P> {
        &self.processes
    }

    pub fn scheduler(&self) -> &Scheduler<P::Event> {
        &self.scheduler
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Returns the time of the next scheduled event, or None if no events are scheduled.
    pub fn peek_next_event_time(&self) -> Option<SimTime> {
        self.scheduler.next_event_time()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.scheduler.is_empty()
    }

    /// Adds a process; it stays idle until an event is scheduled for it.
    pub fn spawn(&mut self, process: P) -> ProcessId {
        let id = self.processes.insert(process);
        debug!(process = %id, "Spawned process");
        id
    }

    /// Schedules `event` for `target` at `self.time() + delay`.
    pub fn schedule(&mut self, delay: SimTime, target: ProcessId, event: P::Event) -> EventId {
        self.scheduler.schedule(delay, target, event)
    }

    /// Performs one step of the simulation. Returns `Ok(true)` if an event was
    /// processed and `Ok(false)` if the queue was empty.
    ///
    /// # Errors
    ///
    /// Fails if the event targets an unknown or terminated process, or if the
    /// resumed process reports an error. The run must not continue after that.
    pub fn step(&mut self) -> Result<bool, SimError> {
        let Some(entry) = self.scheduler.pop() else {
            return Ok(false);
        };
        let (id, time, target) = (entry.id(), entry.time(), entry.target());
        let _span = logging::event_span(id, time).entered();
        if time == SimTime::MAX {
            error!(event_id = %id, target = %target, "Clock exhausted");
            return Err(EventError::ClockExhausted { id, target }.into());
        }
        trace!(event_id = %id, time = %time, target = %target, event = ?entry.event(), "Processing event");

        let mut process = self.processes.take(target).inspect_err(|err| {
            error!(event_id = %id, time = %time, error = %err, "Event addressed to a dead process");
        })?;
        let mut ctx = Context {
            world: &mut self.world,
            scheduler: &mut self.scheduler,
            processes: &mut self.processes,
        };
        let status = process
            .resume(target, entry.into_event(), &mut ctx)
            .inspect_err(|err| {
                error!(process = %target, time = %time, error = %err, "Process failed");
            })?;
        match status {
            ProcessStatus::Suspended => self.processes.restore(target, process),
            ProcessStatus::Terminated => {
                trace!(process = %target, time = %time, "Process terminated");
                self.processes.retire(target);
            }
        }
        self.events_processed += 1;
        Ok(true)
    }

    /// Runs the simulation until the executor's stopping condition.
    ///
    /// See [`Execute`] and [`Executor`] for more details.
    #[instrument(skip(self, executor), fields(initial_time = %self.time()))]
    pub fn execute<E: Execute<P>>(&mut self, executor: E) -> Result<(), SimError> {
        info!("Starting simulation execution");
        executor.execute(self)?;
        info!(
            final_time = %self.time(),
            events_processed = self.events_processed,
            live_processes = self.processes.live(),
            "Simulation execution completed"
        );
        Ok(())
    }

    /// Hands back the world and the remaining processes once the run is over.
    pub fn into_parts(self) -> (P::World, ProcessTable<P>) {
        (self.world, self.processes)
    }
}
