//! Time-based conditions and the clocks they read.

use crate::core::{ActiveStates, Condition, State};
use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Source of the current time for timer conditions.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and advance
/// the clock seen by every condition built from the others.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Met once a delay has passed since the last reset.
///
/// A timer that has never been reset has no deadline and counts as met.
/// The machine resets it whenever the source state of its transition is
/// entered, so in practice the delay is measured from that moment.
#[derive(Clone, Debug)]
pub struct After<C: Clock = SystemClock> {
    delay: Duration,
    clock: C,
    deadline: Option<DateTime<Utc>>,
}

impl After<SystemClock> {
    pub fn new(delay: Duration) -> Self {
        Self::with_clock(delay, SystemClock)
    }

    pub fn millis(milliseconds: u64) -> Self {
        Self::new(Duration::from_millis(milliseconds))
    }
}

impl<C: Clock> After<C> {
    pub fn with_clock(delay: Duration, clock: C) -> Self {
        Self {
            delay,
            clock,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }
}

impl<S: State, E, C: Clock> Condition<S, E> for After<C> {
    fn is_met(&self, _active: &ActiveStates<S>) -> bool {
        match self.deadline {
            Some(deadline) => self.clock.now() > deadline,
            None => true,
        }
    }

    fn reset(&mut self) {
        let now = self.clock.now();
        let deadline = chrono::Duration::from_std(self.delay)
            .ok()
            .and_then(|delay| now.checked_add_signed(delay))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.deadline = Some(deadline);
    }

    fn describe(&self) -> String {
        format!("after {}ms", self.delay.as_millis())
    }
}
