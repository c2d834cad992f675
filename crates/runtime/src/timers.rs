//! Deterministic, cancellable delayed actions.
//!
//! Key properties:
//! - Total ordering on `(due, id)`; timers due at the same instant fire in
//!   scheduling order.
//! - Cancellation removes the entry and drops its payload immediately, so a
//!   cancelled timer can never fire later.
//! - Time is supplied by the caller; the queue never reads a clock.
//!
//! Vec-backed: a tour only ever has a handful of timers in flight.
use core::cmp::Ordering;

use foundation::time::Time;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    due: Time,
    payload: T,
}

impl<T> Entry<T> {
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.due
            .total_cmp(&other.due)
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schedules `payload` to fire `delay_s` seconds after `now`.
    ///
    /// Negative delays are treated as zero.
    pub fn schedule(&mut self, now: Time, delay_s: f64, payload: T) -> TimerId {
        self.schedule_at(now.after(delay_s.max(0.0)), payload)
    }

    pub fn schedule_at(&mut self, due: Time, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry { id, due, payload });
        id
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancels every pending timer, returning how many were released.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn due_at(&self, id: TimerId) -> Option<Time> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.due)
    }

    pub fn next_due(&self) -> Option<Time> {
        self.entries
            .iter()
            .min_by(|a, b| a.key_cmp(b))
            .map(|e| e.due)
    }

    /// Pops the earliest timer whose due time is at or before `now`, together
    /// with that due time. Follow-up timelines start from `due`, not `now`.
    pub fn pop_due(&mut self, now: Time) -> Option<(TimerId, Time, T)> {
        let mut best_idx: Option<usize> = None;
        for (idx, entry) in self.entries.iter().enumerate() {
            if !now.is_at_or_after(entry.due) {
                continue;
            }
            match best_idx {
                None => best_idx = Some(idx),
                Some(best) => {
                    if entry.key_cmp(&self.entries[best]) == Ordering::Less {
                        best_idx = Some(idx);
                    }
                }
            }
        }

        let idx = best_idx?;
        let entry = self.entries.swap_remove(idx);
        Some((entry.id, entry.due, entry.payload))
    }
}
