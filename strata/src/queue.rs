//! The request queue: an ordered, deduplicated set of pending chunk coordinates,
//! guarded by a single mutex paired with two condition variables — the classic
//! monitor pattern, kept as two distinct conditions so an `enqueue` never wakes a
//! `wait_until_empty` waiter and a dequeue never wakes another blocked producer.

use std::sync::{Condvar, Mutex};

use indexmap::IndexSet;

use crate::coord::ChunkCoord;

struct State {
    pending: IndexSet<ChunkCoord>,
    stopped: bool,
}

/// The producer/consumer-facing handle to the pending-chunk queue.
pub struct RequestQueue {
    state: Mutex<State>,
    /// Signaled when a new request is enqueued, or when shutdown begins.
    item_added: Condvar,
    /// Signaled when a request is dequeued or abandoned, or when shutdown begins.
    item_removed: Condvar,
}

impl RequestQueue {

    pub fn new() -> Self {
        Self {
            state: Mutex::new(State { pending: IndexSet::new(), stopped: false }),
            item_added: Condvar::new(),
            item_removed: Condvar::new(),
        }
    }

    /// Admit a coordinate if it isn't already pending. Always non-blocking.
    /// A no-op once the queue has been stopped.
    pub fn enqueue(&self, coord: ChunkCoord) {
        let mut state = self.state.lock().unwrap();
        if state.stopped {
            return;
        }
        if state.pending.insert(coord) {
            self.item_added.notify_one();
        }
    }

    /// Block until a request is available or shutdown is signaled. Returns `None` on
    /// shutdown with an empty queue (the stop sentinel).
    pub fn dequeue_blocking(&self) -> Option<ChunkCoord> {
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(coord) = state.pending.shift_remove_index(0) {
                return Some(coord);
            }
            if state.stopped {
                return None;
            }
            state = self.item_added.wait(state).unwrap();
        }
    }

    /// Signal that an item has left the queue (dequeued, or abandoned as a skip),
    /// waking any thread blocked in `wait_until_empty`.
    pub fn notify_removed(&self) {
        // The item has already been removed by `dequeue_blocking`; this only needs to
        // wake waiters re-checking emptiness.
        self.item_removed.notify_all();
    }

    /// Current queue length. May be stale the instant it's read without holding the
    /// lock, by design (observation only, per the queue's contract).
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Block until the queue is empty, or until shutdown is signaled.
    pub fn wait_until_empty(&self) {
        let mut state = self.state.lock().unwrap();
        while !state.pending.is_empty() && !state.stopped {
            state = self.item_removed.wait(state).unwrap();
        }
    }

    /// Set the stop flag, discard any pending requests (no draining obligation), and
    /// release every blocked waiter. Idempotent.
    pub fn shutdown(&self) {
        let mut state = self.state.lock().unwrap();
        state.stopped = true;
        state.pending.clear();
        drop(state);
        self.item_added.notify_all();
        self.item_removed.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        self.state.lock().unwrap().stopped
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {

    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn dedup_keeps_length_at_one() {
        let queue = RequestQueue::new();
        let coord = ChunkCoord::new(5, 5);
        queue.enqueue(coord);
        queue.enqueue(coord);
        queue.enqueue(coord);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn fifo_on_distinct_coords() {
        let queue = RequestQueue::new();
        queue.enqueue(ChunkCoord::new(0, 0));
        queue.enqueue(ChunkCoord::new(1, 0));
        queue.enqueue(ChunkCoord::new(2, 0));

        assert_eq!(queue.dequeue_blocking(), Some(ChunkCoord::new(0, 0)));
        assert_eq!(queue.dequeue_blocking(), Some(ChunkCoord::new(1, 0)));
        assert_eq!(queue.dequeue_blocking(), Some(ChunkCoord::new(2, 0)));
    }

    #[test]
    fn reenqueue_after_dequeue_is_independent() {
        let queue = RequestQueue::new();
        let coord = ChunkCoord::new(0, 0);
        queue.enqueue(coord);
        assert_eq!(queue.dequeue_blocking(), Some(coord));
        queue.enqueue(coord);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn enqueue_after_stop_is_ignored() {
        let queue = RequestQueue::new();
        queue.shutdown();
        queue.enqueue(ChunkCoord::new(0, 0));
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn dequeue_blocking_returns_stop_sentinel() {
        let queue = Arc::new(RequestQueue::new());
        let worker_queue = Arc::clone(&queue);
        let handle = thread::spawn(move || worker_queue.dequeue_blocking());

        thread::sleep(Duration::from_millis(20));
        queue.shutdown();

        assert_eq!(handle.join().unwrap(), None);
    }

    #[test]
    fn wait_until_empty_returns_after_drain() {
        let queue = Arc::new(RequestQueue::new());
        queue.enqueue(ChunkCoord::new(0, 0));

        let waiter_queue = Arc::clone(&queue);
        let handle = thread::spawn(move || waiter_queue.wait_until_empty());

        thread::sleep(Duration::from_millis(20));
        queue.dequeue_blocking();
        queue.notify_removed();

        handle.join().unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn wait_until_empty_does_not_deadlock_on_shutdown() {
        let queue = Arc::new(RequestQueue::new());
        queue.enqueue(ChunkCoord::new(0, 0));

        let waiter_queue = Arc::clone(&queue);
        let handle = thread::spawn(move || waiter_queue.wait_until_empty());

        thread::sleep(Duration::from_millis(20));
        queue.shutdown();

        handle.join().unwrap();
    }
}
