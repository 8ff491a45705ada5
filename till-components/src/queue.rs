//! Wait lists for resource contention
//!
//! A resource pool parks requesters that find no free slot in a [`Queue`];
//! the order in which they come back out is the order in which they are
//! granted.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use till_core::{ProcessId, SimTime};

/// Item stored in a queue: who is waiting and since when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Process to resume once the item leaves the queue
    pub requester: ProcessId,
    /// Simulation time when the item was enqueued
    pub enqueued_at: SimTime,
}

impl QueueItem {
    pub fn new(requester: ProcessId, enqueued_at: SimTime) -> Self {
        Self {
            requester,
            enqueued_at,
        }
    }

    /// Calculate how long this item has been in the queue
    pub fn queue_time(&self, current_time: SimTime) -> std::time::Duration {
        current_time.duration_since(self.enqueued_at)
    }
}

/// Core trait for wait-list implementations
pub trait Queue {
    /// Add an item to the queue
    fn enqueue(&mut self, item: QueueItem);

    /// Remove and return the next item from the queue
    fn dequeue(&mut self) -> Option<QueueItem>;

    /// Get the current number of items in the queue
    fn len(&self) -> usize;

    /// Check if the queue is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Peek at the next item without removing it
    fn peek(&self) -> Option<&QueueItem>;

    /// Items in the order they will be dequeued.
    fn items(&self) -> Vec<QueueItem>;
}

/// First-In-First-Out (FIFO) queue implementation
///
/// # Examples
///
/// ```
/// use till_components::queue::{FifoQueue, Queue, QueueItem};
/// use till_core::{ProcessId, SimTime};
///
/// let mut queue = FifoQueue::new();
/// queue.enqueue(QueueItem::new(ProcessId(1), SimTime::zero()));
/// assert_eq!(queue.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FifoQueue {
    items: VecDeque<QueueItem>,
    total_enqueued: u64,
    total_dequeued: u64,
}

impl FifoQueue {
    /// Create a new, empty FIFO queue. The queue never refuses an item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of items ever enqueued
    pub fn total_enqueued(&self) -> u64 {
        self.total_enqueued
    }

    /// Get the total number of items ever dequeued
    pub fn total_dequeued(&self) -> u64 {
        self.total_dequeued
    }
}

impl Queue for FifoQueue {
    fn enqueue(&mut self, item: QueueItem) {
        self.items.push_back(item);
        self.total_enqueued += 1;
    }

    fn dequeue(&mut self) -> Option<QueueItem> {
        let item = self.items.pop_front();
        if item.is_some() {
            self.total_dequeued += 1;
        }
        item
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn peek(&self) -> Option<&QueueItem> {
        self.items.front()
    }

    fn items(&self) -> Vec<QueueItem> {
        self.items.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_item(id: u64, time: u64) -> QueueItem {
        QueueItem::new(ProcessId(id), SimTime::from_millis(time))
    }

    #[test]
    fn test_fifo_queue_basic_operations() {
        let mut queue = FifoQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);

        queue.enqueue(create_test_item(1, 100));
        assert_eq!(queue.len(), 1);
        assert!(!queue.is_empty());

        queue.enqueue(create_test_item(2, 200));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek().map(|i| i.requester), Some(ProcessId(1)));

        // FIFO order: first in, first out
        assert_eq!(queue.dequeue().unwrap().requester, ProcessId(1));
        assert_eq!(queue.dequeue().unwrap().requester, ProcessId(2));

        assert!(queue.is_empty());
        assert_eq!(queue.dequeue(), None);
        assert_eq!(queue.total_enqueued(), 2);
        assert_eq!(queue.total_dequeued(), 2);
    }

    #[test]
    fn test_items_in_dequeue_order() {
        let mut queue = FifoQueue::new();
        for id in [4, 2, 9] {
            queue.enqueue(create_test_item(id, id * 10));
        }
        let order: Vec<u64> = queue.items().iter().map(|i| i.requester.0).collect();
        assert_eq!(order, vec![4, 2, 9]);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_queue_time() {
        let item = create_test_item(1, 1_000);
        assert_eq!(
            item.queue_time(SimTime::from_millis(3_500)),
            std::time::Duration::from_millis(2_500)
        );
    }
}
