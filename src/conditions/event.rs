//! Event-based conditions.
//!
//! An event-based condition starts unmet and latches to met the first time
//! its matcher accepts an event. It stays met until the next reset, which
//! happens when the source state of its transition is entered again.

use crate::core::{ActiveStates, Condition, State};
use crate::machine::StateMachine;
use std::fmt::Debug;

/// Decides whether an event satisfies a latched condition.
pub trait EventMatcher<E> {
    fn matches(&mut self, event: &E) -> bool;

    /// Called when the owning latch is reset.
    fn reset(&mut self) {}

    fn describe(&self) -> String;
}

/// Sticky wrapper that turns an [`EventMatcher`] into a [`Condition`].
#[derive(Clone, Debug)]
pub struct Latch<M> {
    matcher: M,
    met: bool,
}

impl<M> Latch<M> {
    pub fn from_matcher(matcher: M) -> Self {
        Self {
            matcher,
            met: false,
        }
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Whether the latch has closed since the last reset.
    pub fn is_latched(&self) -> bool {
        self.met
    }
}

impl<S, E, M> Condition<S, E> for Latch<M>
where
    S: State,
    M: EventMatcher<E>,
{
    fn handle_event(&mut self, event: &E) {
        if !self.met && self.matcher.matches(event) {
            self.met = true;
        }
    }

    fn is_met(&self, _active: &ActiveStates<S>) -> bool {
        self.met
    }

    fn reset(&mut self) {
        self.met = false;
        self.matcher.reset();
    }

    fn describe(&self) -> String {
        self.matcher.describe()
    }
}

/// Matches one specific event.
#[derive(Clone, Debug)]
pub struct EventIs<E> {
    event: E,
}

impl<E: PartialEq + Debug> EventMatcher<E> for EventIs<E> {
    fn matches(&mut self, event: &E) -> bool {
        self.event == *event
    }

    fn describe(&self) -> String {
        format!("{:?}", self.event)
    }
}

/// Matches any event out of a fixed set.
#[derive(Clone, Debug)]
pub struct EventIn<E> {
    events: Vec<E>,
}

impl<E: PartialEq + Debug> EventMatcher<E> for EventIn<E> {
    fn matches(&mut self, event: &E) -> bool {
        self.events.contains(event)
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.events.iter().map(|e| format!("{e:?}")).collect();
        format!("one of ({})", names.join(" "))
    }
}

/// Met once a specific event has been seen since the last reset.
pub type OnEvent<E> = Latch<EventIs<E>>;

/// Met once any of a set of events has been seen since the last reset.
pub type OnAnyEvent<E> = Latch<EventIn<E>>;

impl<E: PartialEq + Debug> Latch<EventIs<E>> {
    pub fn new(event: E) -> Self {
        Latch::from_matcher(EventIs { event })
    }
}

impl<E: PartialEq + Debug> Latch<EventIn<E>> {
    pub fn new(events: impl IntoIterator<Item = E>) -> Self {
        Latch::from_matcher(EventIn {
            events: events.into_iter().collect(),
        })
    }
}

/// Feeds events into an embedded machine and matches once it has finished.
///
/// The embedded machine is owned by the condition. Sharing one machine
/// between several conditions is therefore impossible, and a guard can never
/// reach back into the machine that is evaluating it.
pub struct Embedded<S: State, E, P: Ord + Clone + Debug> {
    machine: StateMachine<S, E, P>,
}

impl<S: State, E, P: Ord + Clone + Debug> EventMatcher<E> for Embedded<S, E, P> {
    fn matches(&mut self, event: &E) -> bool {
        self.machine.handle_event(event);
        self.machine.is_finished()
    }

    fn reset(&mut self) {
        self.machine.reset();
    }

    fn describe(&self) -> String {
        String::from("sub-machine finished")
    }
}

/// Met once an embedded machine has run out of active states.
pub type SubMachine<S, E, P> = Latch<Embedded<S, E, P>>;

impl<S: State, E, P: Ord + Clone + Debug> Latch<Embedded<S, E, P>> {
    pub fn new(machine: StateMachine<S, E, P>) -> Self {
        Latch::from_matcher(Embedded { machine })
    }

    /// The embedded machine, for inspection.
    pub fn machine(&self) -> &StateMachine<S, E, P> {
        &self.matcher.machine
    }
}
