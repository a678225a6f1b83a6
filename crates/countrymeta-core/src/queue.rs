//! Blocking work queue with requeue support for a bounded worker pool.
//!
//! Uses `Mutex + Condvar` from std. Workers claim items with
//! [`next()`](RetryQueue::next); whoever classifies the result either
//! [`requeue`](RetryQueue::requeue)s the item or marks it
//! [`complete`](RetryQueue::complete). The queue is drained once nothing is
//! pending and nothing is in flight.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};

struct QueueState<T> {
    pending: VecDeque<T>,
    in_flight: usize,
    closed: bool,
}

/// Work queue whose items may be pushed back after a failed attempt.
pub struct RetryQueue<T> {
    state: Mutex<QueueState<T>>,
    cond: Condvar,
}

impl<T> RetryQueue<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        let pending: VecDeque<T> = items.into_iter().collect();
        log::debug!("{} items in work queue", pending.len());
        Self {
            state: Mutex::new(QueueState {
                pending,
                in_flight: 0,
                closed: false,
            }),
            cond: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        // Holders never panic while mutating, so a poisoned lock is still consistent
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Claim the next item.
    ///
    /// Blocks while the queue is empty but other items are still in flight
    /// (they may be requeued). Returns `None` once drained or closed.
    pub fn next(&self) -> Option<T> {
        let mut state = self.lock();
        loop {
            if state.closed {
                return None;
            }
            if let Some(item) = state.pending.pop_front() {
                state.in_flight += 1;
                return Some(item);
            }
            if state.in_flight == 0 {
                return None;
            }
            state = self.cond.wait(state).unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Return a claimed item to the back of the queue.
    pub fn requeue(&self, item: T) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        state.pending.push_back(item);
        self.cond.notify_one();
    }

    /// Release a claimed item that reached a terminal outcome.
    pub fn complete(&self) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.in_flight == 0 && state.pending.is_empty() {
            self.cond.notify_all();
        }
    }

    /// Stop handing out work; blocked workers wake up with `None`.
    pub fn close(&self) {
        self.lock().closed = true;
        self.cond.notify_all();
    }

    /// Items waiting to be claimed
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Items claimed but not yet requeued/completed
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }
}
