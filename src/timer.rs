//! Deferred state transitions.
//!
//! Timers are polled by the event loop rather than run on threads; every
//! method takes the current instant so behavior is deterministic in tests.

use std::time::{Duration, Instant};

/// Handle to a scheduled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Scheduled<T> {
    handle: TimerHandle,
    due: Instant,
    action: T,
}

/// A set of pending delayed actions.
#[derive(Debug)]
pub struct Timers<T> {
    pending: Vec<Scheduled<T>>,
    next_id: u64,
}

impl<T> Timers<T> {
    /// Create an empty timer set.
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `action` to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, action: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            handle,
            due: now + delay,
            action,
        });
        handle
    }

    /// Cancel a pending action. Returns false if it already fired.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.handle != handle);
        self.pending.len() != before
    }

    /// Remove and return every action due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = pending;
        // stable: equal deadlines fire in scheduling order
        due.sort_by_key(|s| s.due);
        due.into_iter().map(|s| s.action).collect()
    }

    /// Drop every pending action.
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!("Cancelling {} pending timers", self.pending.len());
        }
        self.pending.clear();
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_at_deadline_not_before() {
        let start = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(start, Duration::from_millis(3000), "clear");

        assert!(timers.take_due(start + Duration::from_millis(2999)).is_empty());
        assert_eq!(timers.take_due(start + Duration::from_millis(3000)), ["clear"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn due_actions_come_out_in_deadline_order() {
        let start = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(start, Duration::from_millis(20), 2);
        timers.schedule(start, Duration::from_millis(10), 1);
        timers.schedule(start, Duration::from_millis(20), 3);

        assert_eq!(timers.take_due(start + Duration::from_millis(50)), [1, 2, 3]);
    }

    #[test]
    fn cancelled_actions_never_fire() {
        let start = Instant::now();
        let mut timers = Timers::new();
        let a = timers.schedule(start, Duration::from_millis(10), 'a');
        timers.schedule(start, Duration::from_millis(10), 'b');

        assert!(timers.cancel(a));
        assert!(!timers.cancel(a));
        assert_eq!(timers.take_due(start + Duration::from_secs(1)), ['b']);
    }

    #[test]
    fn cancel_all_empties_the_set() {
        let start = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(start, Duration::from_millis(10), ());
        timers.cancel_all();
        assert!(timers.is_empty());
        assert!(timers.take_due(start + Duration::from_secs(1)).is_empty());
    }
}
