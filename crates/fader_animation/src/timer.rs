//! Timer queue
//!
//! A virtual-time stand-in for `setTimeout` / `setInterval`. Time only moves
//! when the owner pops due timers; timers fire in deadline order, and timers
//! sharing a deadline fire in the order they were (re)armed.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct TimerId;
}

/// One-shot or repeating
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once, then disappears
    Once,
    /// Fires every `n` milliseconds until cancelled
    Every(u32),
}

struct TimerEntry<T> {
    deadline: u64,
    seq: u64,
    kind: TimerKind,
    payload: T,
}

/// Timers keyed by [`TimerId`], each carrying a payload
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, TimerEntry<T>>,
    now: u64,
    next_seq: u64,
}

impl<T: Copy> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            now: 0,
            next_seq: 0,
        }
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now
    }

    /// Call once after `delay_ms`
    pub fn once(&mut self, delay_ms: u32, payload: T) -> TimerId {
        self.arm(delay_ms, TimerKind::Once, payload)
    }

    /// Call every `interval_ms` until cancelled
    ///
    /// A zero interval is treated as 1ms so the queue always makes progress.
    pub fn every(&mut self, interval_ms: u32, payload: T) -> TimerId {
        let interval_ms = interval_ms.max(1);
        self.arm(interval_ms, TimerKind::Every(interval_ms), payload)
    }

    /// Cancel a timer, returning its payload if it was still scheduled
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(id).map(|entry| entry.payload)
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Deadline of the next timer to fire
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.values().map(|entry| entry.deadline).min()
    }

    /// Pop the earliest timer due at or before `until`
    ///
    /// Moves the clock to that timer's deadline. One-shot timers are removed;
    /// repeating timers are re-armed one interval later.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerId, T)> {
        let (id, deadline) = self
            .timers
            .iter()
            .filter(|(_, entry)| entry.deadline <= until)
            .min_by_key(|(_, entry)| (entry.deadline, entry.seq))
            .map(|(id, entry)| (id, entry.deadline))?;

        self.now = self.now.max(deadline);

        let kind = self.timers.get(id)?.kind;
        match kind {
            TimerKind::Once => {
                let entry = self.timers.remove(id)?;
                Some((id, entry.payload))
            }
            TimerKind::Every(interval) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let entry = self.timers.get_mut(id)?;
                entry.deadline += interval as u64;
                entry.seq = seq;
                Some((id, entry.payload))
            }
        }
    }

    /// Move the clock forward without firing anything
    pub fn settle(&mut self, until: u64) {
        self.now = self.now.max(until);
    }

    /// Get the number of scheduled timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    fn arm(&mut self, delay_ms: u32, kind: TimerKind, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(TimerEntry {
            deadline: self.now + delay_ms as u64,
            seq,
            kind,
            payload,
        })
    }
}

impl<T: Copy> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
