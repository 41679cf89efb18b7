//! Cooperative one-shot timers
//!
//! A [`TimerQueue`] belongs to exactly one owner (a scheduler instance).
//! Timers never fire on their own: the owner asks for due entries with the
//! current [`Timestamp`] and handles the payloads. Dropping or clearing the
//! queue cancels everything that is still pending.

use std::time::Duration;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::clock::Timestamp;

new_key_type! {
    /// Cancellation handle for an armed timer
    pub struct TimerId;
}

struct PendingTimer<T> {
    deadline: Timestamp,
    /// Arming order, breaks ties between equal deadlines
    seq: u64,
    payload: T,
}

/// A set of pending one-shot timers carrying payloads of type `T`
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, PendingTimer<T>>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    /// Arm a timer that becomes due at `deadline`
    pub fn arm(&mut self, deadline: Timestamp, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        tracing::trace!(deadline = %deadline, seq, "timer armed");
        self.timers.insert(PendingTimer {
            deadline,
            seq,
            payload,
        })
    }

    /// Arm a timer that becomes due `delay` after `now`
    pub fn arm_after(&mut self, now: Timestamp, delay: Duration, payload: T) -> TimerId {
        self.arm(now.saturating_add(delay), payload)
    }

    /// Cancel a timer, returning its payload if it was still pending
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let timer = self.timers.remove(id)?;
        tracing::trace!(deadline = %timer.deadline, "timer cancelled");
        Some(timer.payload)
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    pub fn deadline(&self, id: TimerId) -> Option<Timestamp> {
        self.timers.get(id).map(|timer| timer.deadline)
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.timers.values().map(|timer| timer.deadline).min()
    }

    /// Remove and return the earliest timer due at `now`
    pub fn pop_due(&mut self, now: Timestamp) -> Option<(TimerId, T)> {
        let id = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.deadline <= now)
            .min_by_key(|(_, timer)| (timer.deadline, timer.seq))
            .map(|(id, _)| id)?;
        self.timers.remove(id).map(|timer| (id, timer.payload))
    }

    /// Remove every timer due at `now`, in deadline order
    pub fn drain_due(&mut self, now: Timestamp) -> SmallVec<[(TimerId, T); 4]> {
        let mut due = SmallVec::new();
        while let Some(entry) = self.pop_due(now) {
            due.push(entry);
        }
        due
    }

    /// Cancel all pending timers
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
