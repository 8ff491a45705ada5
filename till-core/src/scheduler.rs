use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::types::{EventId, ProcessId};
use crate::SimTime;

/// Entry stored in the scheduler: the payload to deliver, the process to
/// resume, and the time at which that should happen.
///
/// Entries are ordered by `(time, id)`, so events due at the same instant
/// come out in the order they were scheduled.
#[derive(Debug)]
pub struct EventEntry<E> {
    id: EventId,
    time: SimTime,
    target: ProcessId,
    event: E,
}

impl<E> EventEntry<E> {
    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn target(&self) -> ProcessId {
        self.target
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    pub fn into_event(self) -> E {
        self.event
    }
}

impl<E> PartialEq for EventEntry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.id == other.id
    }
}

impl<E> Eq for EventEntry<E> {}

impl<E> PartialOrd for EventEntry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for EventEntry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior in BinaryHeap
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.id.cmp(&self.id))
    }
}

type Clock = Rc<Cell<SimTime>>;

/// Read-only view of the simulation clock.
///
/// The clock itself is owned by the scheduler; anything else can hold a
/// `ClockRef` to observe the current time without being able to move it.
///
/// # Example
///
/// ```
/// # use till_core::Scheduler;
/// let scheduler: Scheduler<()> = Scheduler::default();
/// let clock_ref = scheduler.clock();
/// assert_eq!(clock_ref.time(), scheduler.time());
/// ```
#[derive(Clone)]
pub struct ClockRef {
    clock: Clock,
}

impl From<Clock> for ClockRef {
    fn from(clock: Clock) -> Self {
        Self { clock }
    }
}

impl ClockRef {
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock.get()
    }
}

impl fmt::Debug for ClockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClockRef").field(&self.time()).finish()
    }
}

/// Keeps the current time and the pending events.
///
/// Time only moves forward, and only when [`Scheduler::pop`] hands out the
/// next event.
pub struct Scheduler<E> {
    next_event_id: u64,
    events: BinaryHeap<EventEntry<E>>,
    clock: Clock,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            next_event_id: 0,
            events: BinaryHeap::default(),
            clock: Rc::new(Cell::new(SimTime::zero())),
        }
    }
}

impl<E: fmt::Debug> Scheduler<E> {
    /// Schedules `event` for `target` at `self.time() + delay`.
    pub fn schedule(&mut self, delay: SimTime, target: ProcessId, event: E) -> EventId {
        let time = self.time() + delay;
        self.push(time, target, event)
    }

    /// Schedules `event` for `target` at the current time, after every event
    /// already due at this instant.
    pub fn schedule_now(&mut self, target: ProcessId, event: E) -> EventId {
        self.push(self.time(), target, event)
    }

    fn push(&mut self, time: SimTime, target: ProcessId, event: E) -> EventId {
        let id = EventId(self.next_event_id);
        self.next_event_id += 1;
        trace!(event_id = %id, time = %time, target = %target, event = ?event, "Event scheduled");
        self.events.push(EventEntry {
            id,
            time,
            target,
            event,
        });
        id
    }
}

impl<E> Scheduler<E> {
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock.get()
    }

    #[must_use]
    pub fn clock(&self) -> ClockRef {
        ClockRef {
            clock: Rc::clone(&self.clock),
        }
    }

    /// Returns the next scheduled event without removing it.
    pub fn peek(&self) -> Option<&EventEntry<E>> {
        self.events.peek()
    }

    pub fn next_event_time(&self) -> Option<SimTime> {
        self.events.peek().map(EventEntry::time)
    }

    /// Removes the next scheduled event and advances the clock to its time.
    pub fn pop(&mut self) -> Option<EventEntry<E>> {
        self.events.pop().inspect(|event| {
            debug_assert!(event.time >= self.clock.get(), "clock moved backwards");
            self.clock.replace(event.time);
        })
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
