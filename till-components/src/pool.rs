//! Counted resource pool with a FIFO wait list
//!
//! A [`ResourcePool`] owns `capacity` identical slots (cashiers, terminals).
//! A requester either gets a slot at once or joins the tail of the wait list.
//! When a holder releases its slot and someone is waiting, the slot passes
//! straight to the head of the list and a [`Grant`] event is scheduled for it
//! at the current time, so the slot is never observed free in between.
//!
//! ```
//! use till_components::pool::{Acquire, Grant, ResourcePool};
//! use till_core::{ProcessId, Scheduler, SimTime};
//!
//! #[derive(Debug)]
//! struct Granted(Grant);
//!
//! impl From<Grant> for Granted {
//!     fn from(grant: Grant) -> Self {
//!         Granted(grant)
//!     }
//! }
//!
//! let mut scheduler: Scheduler<Granted> = Scheduler::default();
//! let mut pool = ResourcePool::new("cashier", 1);
//!
//! let Acquire::Granted(token) = pool.acquire(ProcessId(0), SimTime::zero()) else {
//!     unreachable!()
//! };
//! assert!(matches!(pool.acquire(ProcessId(1), SimTime::zero()), Acquire::Queued { position: 0 }));
//!
//! let handoff = pool.release(token, &mut scheduler).unwrap().unwrap();
//! assert_eq!(handoff.requester, ProcessId(1));
//! assert_eq!(scheduler.peek().unwrap().target(), ProcessId(1));
//! assert_eq!(pool.in_service(), 1);
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use till_core::{ProcessId, Scheduler, SimTime};
use tracing::{debug, trace};

use crate::error::ResourceError;
use crate::queue::{FifoQueue, Queue, QueueItem};

/// Proof of holding one slot of a pool. Handed back on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantToken(u64);

impl GrantToken {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GrantToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grant({})", self.0)
    }
}

/// Payload delivered to a waiter when a slot is handed over to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub token: GrantToken,
    /// When the waiter joined the wait list.
    pub queued_at: SimTime,
}

/// Outcome of [`ResourcePool::acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    /// A slot was free; the requester holds it from now on.
    Granted(GrantToken),
    /// No slot was free; the requester is parked with this many ahead of it.
    Queued { position: usize },
}

/// A slot handed from a releasing holder to the head of the wait list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handoff {
    pub requester: ProcessId,
    pub token: GrantToken,
    pub queued_at: SimTime,
}

/// Counters kept by a pool over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolStats {
    pub granted_immediately: u64,
    pub granted_after_wait: u64,
    pub released: u64,
    pub peak_queue_len: usize,
    /// Slot-time units spent in service, up to the last pool operation.
    pub busy_time: f64,
}

impl PoolStats {
    pub fn total_granted(&self) -> u64 {
        self.granted_immediately + self.granted_after_wait
    }
}

pub struct ResourcePool {
    name: String,
    capacity: usize,
    in_service: usize,
    wait_queue: Box<dyn Queue>,
    active: HashSet<GrantToken>,
    next_token: u64,
    last_change: SimTime,
    stats: PoolStats,
}

impl ResourcePool {
    /// Creates a pool with a FIFO wait list.
    ///
    /// A pool with zero capacity is legal: nobody is ever granted a slot and
    /// every requester waits forever.
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
            in_service: 0,
            wait_queue: Box::new(FifoQueue::new()),
            active: HashSet::new(),
            next_token: 0,
            last_change: SimTime::zero(),
            stats: PoolStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_service(&self) -> usize {
        self.in_service
    }

    pub fn queue_len(&self) -> usize {
        self.wait_queue.len()
    }

    pub fn has_capacity(&self) -> bool {
        self.in_service < self.capacity
    }

    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Waiters in grant order.
    pub fn waiting(&self) -> Vec<QueueItem> {
        self.wait_queue.items()
    }

    /// Mean fraction of slots busy over `[0, until]`.
    pub fn utilization(&self, until: SimTime) -> f64 {
        let elapsed = until.as_secs_f64();
        if self.capacity == 0 || elapsed <= 0.0 {
            return 0.0;
        }
        let tail = until.duration_since(self.last_change).as_secs_f64() * self.in_service as f64;
        (self.stats.busy_time + tail) / (elapsed * self.capacity as f64)
    }

    /// Takes a free slot for `requester`, or appends it to the wait list.
    pub fn acquire(&mut self, requester: ProcessId, at: SimTime) -> Acquire {
        if self.has_capacity() {
            self.accumulate_busy_time(at);
            let token = self.issue_token();
            self.stats.granted_immediately += 1;
            trace!(pool = %self.name, requester = %requester, token = %token, "Slot granted");
            return Acquire::Granted(token);
        }

        let position = self.wait_queue.len();
        self.wait_queue.enqueue(QueueItem::new(requester, at));
        self.stats.peak_queue_len = self.stats.peak_queue_len.max(self.wait_queue.len());
        debug!(
            pool = %self.name,
            requester = %requester,
            position = position,
            in_service = self.in_service,
            "Requester queued"
        );
        Acquire::Queued { position }
    }

    /// Frees the slot held under `token`.
    ///
    /// If anyone is waiting, the slot goes to the head of the wait list and a
    /// [`Grant`] is scheduled for it at the current time.
    ///
    /// # Errors
    ///
    /// Fails if the pool has nothing in service or `token` is not an active
    /// grant of this pool. Either means the model is broken.
    pub fn release<E>(
        &mut self,
        token: GrantToken,
        scheduler: &mut Scheduler<E>,
    ) -> Result<Option<Handoff>, ResourceError>
    where
        E: From<Grant> + fmt::Debug,
    {
        if self.in_service == 0 {
            return Err(ResourceError::ReleaseOnIdlePool {
                pool: self.name.clone(),
            });
        }
        if !self.active.remove(&token) {
            return Err(ResourceError::UnknownGrant {
                pool: self.name.clone(),
                token: token.as_u64(),
            });
        }

        let now = scheduler.time();
        self.accumulate_busy_time(now);
        self.in_service -= 1;
        self.stats.released += 1;

        let Some(next) = self.wait_queue.dequeue() else {
            trace!(pool = %self.name, token = %token, "Slot released");
            return Ok(None);
        };

        let token = self.issue_token();
        self.stats.granted_after_wait += 1;
        scheduler.schedule_now(
            next.requester,
            E::from(Grant {
                token,
                queued_at: next.enqueued_at,
            }),
        );
        debug!(
            pool = %self.name,
            requester = %next.requester,
            waited = next.queue_time(now).as_secs_f64(),
            "Slot handed to waiter"
        );
        Ok(Some(Handoff {
            requester: next.requester,
            token,
            queued_at: next.enqueued_at,
        }))
    }

    /// Checks that the pool never exceeds its capacity and never keeps anyone
    /// waiting while a slot is free.
    pub fn check_invariants(&self) -> Result<(), ResourceError> {
        let violation = |detail: String| ResourceError::InvariantViolated {
            pool: self.name.clone(),
            detail,
        };
        if self.in_service > self.capacity {
            return Err(violation(format!(
                "{} in service exceeds capacity {}",
                self.in_service, self.capacity
            )));
        }
        if self.in_service != self.active.len() {
            return Err(violation(format!(
                "{} in service but {} active grants",
                self.in_service,
                self.active.len()
            )));
        }
        if !self.wait_queue.is_empty() && self.has_capacity() {
            return Err(violation(format!(
                "{} waiting while {} of {} slots are busy",
                self.wait_queue.len(),
                self.in_service,
                self.capacity
            )));
        }
        Ok(())
    }

    fn issue_token(&mut self) -> GrantToken {
        let token = GrantToken(self.next_token);
        self.next_token += 1;
        self.in_service += 1;
        self.active.insert(token);
        token
    }

    fn accumulate_busy_time(&mut self, now: SimTime) {
        let elapsed = now.duration_since(self.last_change).as_secs_f64();
        self.stats.busy_time += elapsed * self.in_service as f64;
        self.last_change = now;
    }
}

impl fmt::Debug for ResourcePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePool")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("in_service", &self.in_service)
            .field("queue_len", &self.wait_queue.len())
            .finish()
    }
}
