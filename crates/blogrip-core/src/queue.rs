//! Unbounded task queue shared between the scheduler and the download workers.
//!
//! Every `put` increments an unfinished counter that is only decremented by
//! `task_done`, so `join` returns once each queued item has been both taken
//! and completed. Order of delivery is FIFO, though nothing relies on it.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

struct State<T> {
    items: VecDeque<T>,
    unfinished: usize,
}

pub struct TaskQueue<T> {
    state: Mutex<State<T>>,
    /// Signalled when an item is put.
    available: Condvar,
    /// Signalled when the unfinished count reaches zero.
    drained: Condvar,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                unfinished: 0,
            }),
            available: Condvar::new(),
            drained: Condvar::new(),
        }
    }

    // Every mutation is a single step under the lock, so a poisoned state is still consistent.
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn put(&self, item: T) {
        let mut state = self.lock();
        state.items.push_back(item);
        state.unfinished += 1;
        drop(state);
        self.available.notify_one();
    }

    /// Blocks until an item is available and removes it.
    pub fn take(&self) -> T {
        let mut state = self.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                return item;
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Marks one previously taken item as complete.
    pub fn task_done(&self) {
        let mut state = self.lock();
        if state.unfinished == 0 {
            tracing::warn!("task_done called more times than items were put");
            return;
        }
        state.unfinished -= 1;
        if state.unfinished == 0 {
            self.drained.notify_all();
        }
    }

    /// Blocks until every item put so far has been taken and marked done.
    pub fn join(&self) {
        let mut state = self.lock();
        while state.unfinished > 0 {
            state = self
                .drained
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Items waiting to be taken.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items put but not yet marked done (queued plus in flight).
    pub fn unfinished(&self) -> usize {
        self.lock().unfinished
    }
}
