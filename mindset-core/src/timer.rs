//! Deferred actions on a logical clock.
//!
//! The session never sleeps. Delayed mutations (the celebrate transition,
//! the tier-3 auto-highlight, incorrect-tap expiry) are queued here with a
//! due time and the **epoch** that was current when they were scheduled.
//! The owner advances the clock explicitly; anything whose epoch has since
//! moved on is dropped instead of delivered, so a leftover action from a
//! finished phase can never touch the next phase's state.
//!
//! Hosts that run against real time ask [`Scheduler::next_deadline`] how
//! long to sleep and then advance by the elapsed time.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Handle to one scheduled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Generation counter; bumped on every phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Epoch(pub u64);

#[derive(Debug, Clone)]
struct Pending<A> {
    id: TimerId,
    due: Duration,
    epoch: Epoch,
    action: A,
}

/// An action whose due time has been reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<A> {
    /// Handle returned when it was scheduled.
    pub id: TimerId,
    /// Logical time it was due at.
    pub due: Duration,
    /// The action itself.
    pub action: A,
}

/// Epoch-keyed queue of deferred actions.
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    now: Duration,
    epoch: Epoch,
    next_id: u64,
    // Kept sorted by (due, id) so equal deadlines fire in scheduling order.
    pending: Vec<Pending<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    /// Empty scheduler at time zero, epoch zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            epoch: Epoch::default(),
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current logical time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Current epoch.
    #[must_use]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Number of actions still waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue `action` to fire `delay` from now in the current epoch.
    pub fn schedule(&mut self, delay: Duration, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now.saturating_add(delay);
        let at = self
            .pending
            .partition_point(|p| (p.due, p.id) <= (due, id));
        self.pending.insert(
            at,
            Pending {
                id,
                due,
                epoch: self.epoch,
                action,
            },
        );
        id
    }

    /// Drop one pending action. Returns `false` if it already fired or was dropped.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Start a new epoch and discard everything scheduled in older ones.
    pub fn bump_epoch(&mut self) -> Epoch {
        self.epoch = Epoch(self.epoch.0 + 1);
        let epoch = self.epoch;
        self.pending.retain(|p| p.epoch == epoch);
        epoch
    }

    /// Discard every pending action without touching the clock.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Time from now until the earliest pending action, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending
            .first()
            .map(|p| p.due.saturating_sub(self.now))
    }

    /// Pop the earliest action due at or before `until`, moving the clock
    /// to its due time. Returns `None` (and moves the clock to `until`)
    /// once nothing else is due.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<A>> {
        loop {
            let Some(first) = self.pending.first() else {
                self.now = self.now.max(until);
                return None;
            };
            if first.due > until {
                self.now = self.now.max(until);
                return None;
            }
            let p = self.pending.remove(0);
            self.now = self.now.max(p.due);
            if p.epoch != self.epoch {
                continue;
            }
            return Some(Fired {
                id: p.id,
                due: p.due,
                action: p.action,
            });
        }
    }
}
