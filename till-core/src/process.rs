//! Processes and the arena that owns them
//!
//! A process is an explicit state machine. The kernel resumes it with one
//! event at a time; the process does its work, schedules whatever it waits on
//! next, and reports whether it is still alive.

use std::fmt;

use crate::error::SimError;
use crate::scheduler::{ClockRef, Scheduler};
use crate::types::{EventId, ProcessId};
use crate::SimTime;

/// Outcome of resuming a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Waiting for a timer or a grant it has arranged; stays in the table.
    Suspended,
    /// Finished; dropped from the table. Any later event for it is a defect.
    Terminated,
}

/// A simulated entity driven by the scheduler.
///
/// All processes of one simulation share an event type and a world (the
/// shared model state such as resource pools and the random source).
pub trait Process: Sized {
    type Event: fmt::Debug;
    type World;

    /// Runs the process until its next suspension point.
    fn resume(
        &mut self,
        self_id: ProcessId,
        event: Self::Event,
        ctx: &mut Context<'_, Self>,
    ) -> Result<ProcessStatus, SimError>;
}

enum Slot<P> {
    Live(P),
    Running,
    Terminated,
}

/// Arena of processes indexed by [`ProcessId`].
///
/// Ids are never reused, so an event addressed to a finished process is
/// detected instead of waking an unrelated one.
pub struct ProcessTable<P> {
    slots: Vec<Slot<P>>,
    live: usize,
}

impl<P> Default for ProcessTable<P> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }
}

impl<P> ProcessTable<P> {
    pub fn insert(&mut self, process: P) -> ProcessId {
        let id = ProcessId(self.slots.len() as u64);
        self.slots.push(Slot::Live(process));
        self.live += 1;
        id
    }

    pub fn get(&self, id: ProcessId) -> Option<&P> {
        match self.slots.get(id.index()) {
            Some(Slot::Live(process)) => Some(process),
            _ => None,
        }
    }

    /// Processes that have not terminated, in spawn order.
    pub fn iter_live(&self) -> impl Iterator<Item = (ProcessId, &P)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Live(process) => Some((ProcessId(index as u64), process)),
                _ => None,
            })
    }

    /// Number of processes that have not terminated.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Number of processes ever spawned.
    pub fn spawned(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn take(&mut self, id: ProcessId) -> Result<P, SimError> {
        let slot = self
            .slots
            .get_mut(id.index())
            .ok_or(SimError::ProcessNotFound { id })?;
        match std::mem::replace(slot, Slot::Running) {
            Slot::Live(process) => Ok(process),
            Slot::Running => Err(SimError::ProcessReentered { id }),
            Slot::Terminated => {
                *slot = Slot::Terminated;
                Err(SimError::ProcessTerminated { id })
            }
        }
    }

    pub(crate) fn restore(&mut self, id: ProcessId, process: P) {
        self.slots[id.index()] = Slot::Live(process);
    }

    pub(crate) fn retire(&mut self, id: ProcessId) {
        self.slots[id.index()] = Slot::Terminated;
        self.live -= 1;
    }
}

/// What a process can touch while it runs.
pub struct Context<'a, P: Process> {
    pub(crate) world: &'a mut P::World,
    pub(crate) scheduler: &'a mut Scheduler<P::Event>,
    pub(crate) processes: &'a mut ProcessTable<P>,
}

impl<'a, P: Process> Context<'a, P> {
    pub fn now(&self) -> SimTime {
        self.scheduler.time()
    }

    pub fn clock(&self) -> ClockRef {
        self.scheduler.clock()
    }

    pub fn world(&mut self) -> &mut P::World {
        &mut *self.world
    }

    /// Splits the context so the world (e.g. a resource pool) can schedule
    /// events while it is borrowed.
    pub fn parts(&mut self) -> (&mut P::World, &mut Scheduler<P::Event>) {
        (&mut *self.world, &mut *self.scheduler)
    }

    /// Suspends `self_id` until `delay` has elapsed.
    pub fn sleep(&mut self, self_id: ProcessId, delay: SimTime, event: P::Event) -> EventId {
        self.scheduler.schedule(delay, self_id, event)
    }

    pub fn schedule(&mut self, delay: SimTime, target: ProcessId, event: P::Event) -> EventId {
        self.scheduler.schedule(delay, target, event)
    }

    pub fn schedule_now(&mut self, target: ProcessId, event: P::Event) -> EventId {
        self.scheduler.schedule_now(target, event)
    }

    /// Adds a process to the table. It does nothing until an event is
    /// scheduled for it.
    pub fn spawn(&mut self, process: P) -> ProcessId {
        self.processes.insert(process)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lifecycle() {
        let mut table = ProcessTable::default();
        let a = table.insert("a");
        let b = table.insert("b");
        assert_eq!(table.live(), 2);

        let taken = table.take(a).unwrap();
        assert_eq!(taken, "a");
        assert!(table.get(a).is_none());
        assert!(matches!(table.take(a), Err(SimError::ProcessReentered { .. })));
        table.restore(a, taken);
        assert_eq!(table.get(a), Some(&"a"));

        table.take(b).unwrap();
        table.retire(b);
        assert_eq!(table.live(), 1);
        assert_eq!(table.spawned(), 2);
        assert!(matches!(table.take(b), Err(SimError::ProcessTerminated { .. })));
        // Still terminated after the failed take.
        assert!(matches!(table.take(b), Err(SimError::ProcessTerminated { .. })));
        assert!(matches!(
            table.take(ProcessId(9)),
            Err(SimError::ProcessNotFound { .. })
        ));

        let live: Vec<_> = table.iter_live().map(|(id, p)| (id, *p)).collect();
        assert_eq!(live, vec![(a, "a")]);
    }
}
