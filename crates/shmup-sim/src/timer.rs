//! Simulated-time timer queue.
//!
//! Tasks are ordered by due time, then by insertion order. Time is kept as a
//! `Duration` so repeated intervals add up exactly. Popping a task moves the
//! queue's clock to that task's due time, so a task that reschedules itself
//! from inside its handler stays anchored to its own firing time.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

/// Handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Scheduled<T> {
    due: Duration,
    id: TimerId,
    task: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.id == other.id
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    // Reversed so the max-heap pops the earliest task first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.id.0.cmp(&self.id.0))
    }
}

/// A queue of tasks firing at simulated times.
pub struct TimerQueue<T> {
    now: Duration,
    next_id: u64,
    heap: BinaryHeap<Scheduled<T>>,
    cancelled: HashSet<TimerId>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            heap: BinaryHeap::new(),
            cancelled: HashSet::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time of the queue.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to fire `delay` after the current time.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.heap.push(Scheduled {
            due: self.now + delay,
            id,
            task,
        });
        id
    }

    /// Cancel a pending task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let pending = self.heap.iter().any(|s| s.id == id);
        pending && self.cancelled.insert(id)
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.cancelled.clear();
    }

    /// Pop the earliest task due at or before `until`, moving the clock to
    /// its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<(Duration, T)> {
        loop {
            if self.heap.peek()?.due > until {
                return None;
            }
            let scheduled = self.heap.pop()?;
            if self.cancelled.remove(&scheduled.id) {
                continue;
            }
            self.now = self.now.max(scheduled.due);
            return Some((scheduled.due, scheduled.task));
        }
    }

    /// Move the clock forward to `t`. Does nothing if `t` is in the past.
    pub fn advance_to(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }

    /// Due time of a pending task.
    pub fn due_of(&self, id: TimerId) -> Option<Duration> {
        if self.cancelled.contains(&id) {
            return None;
        }
        self.heap.iter().find(|s| s.id == id).map(|s| s.due)
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<Duration> {
        self.heap
            .iter()
            .filter(|s| !self.cancelled.contains(&s.id))
            .map(|s| s.due)
            .min()
    }

    /// Number of pending (non-cancelled) tasks.
    pub fn len(&self) -> usize {
        self.heap.len() - self.cancelled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
