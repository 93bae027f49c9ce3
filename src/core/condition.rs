//! The guard interface that transitions depend on.
//!
//! A condition is a small stateful object with a three step lifecycle:
//! `reset` when the source state of its transition is entered, any number of
//! `handle_event` calls while that state stays active, and `is_met` queries
//! during polling.
//!
//! Conditions come in two shapes. Event-based conditions latch on a matching
//! event and stay met until reset. Non-event-based conditions compute
//! `is_met` from something else (the clock, the active states, a worker
//! thread) and keep the default no-op `handle_event` and `reset`.

use super::state::{ActiveStates, State};
use std::fmt;

/// A guard on a transition.
///
/// `is_met` receives the active states of the machine that owns the
/// transition, so state-query guards need no back-reference to the machine.
pub trait Condition<S: State, E> {
    /// Observe an event. Ignored by non-event-based conditions.
    fn handle_event(&mut self, _event: &E) {}

    /// Whether this condition currently allows its transition to fire.
    fn is_met(&self, active: &ActiveStates<S>) -> bool;

    /// Called every time the source state of the owning transition is entered.
    fn reset(&mut self) {}

    /// Short human readable description, used in diagrams and logs.
    fn describe(&self) -> String {
        String::from("condition")
    }
}

/// Conjunction of conditions. Empty means "always met".
///
/// # Example
///
/// ```rust
/// use polystate::conditions::{Always, OnEvent};
/// use polystate::core::{ActiveStates, Conditions};
///
/// let mut conditions: Conditions<char, &str> = Conditions::new()
///     .with(Always)
///     .with(OnEvent::new("go"));
///
/// let active = ActiveStates::new();
/// assert!(!conditions.is_met(&active));
///
/// conditions.handle_event(&"go");
/// assert!(conditions.is_met(&active));
///
/// conditions.reset();
/// assert!(!conditions.is_met(&active));
/// ```
pub struct Conditions<S: State, E> {
    items: Vec<Box<dyn Condition<S, E>>>,
}

impl<S: State, E> Default for Conditions<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E> Conditions<S, E> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a condition to the conjunction.
    pub fn push<C>(&mut self, condition: C)
    where
        C: Condition<S, E> + 'static,
    {
        self.items.push(Box::new(condition));
    }

    pub fn push_boxed(&mut self, condition: Box<dyn Condition<S, E>>) {
        self.items.push(condition);
    }

    /// Move every condition of `other` into this conjunction.
    pub fn append(&mut self, other: Conditions<S, E>) {
        self.items.extend(other.items);
    }

    /// Builder-style `push`.
    pub fn with<C>(mut self, condition: C) -> Self
    where
        C: Condition<S, E> + 'static,
    {
        self.push(condition);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn handle_event(&mut self, event: &E) {
        for condition in &mut self.items {
            condition.handle_event(event);
        }
    }

    /// True when every condition is met.
    pub fn is_met(&self, active: &ActiveStates<S>) -> bool {
        self.items.iter().all(|condition| condition.is_met(active))
    }

    pub fn reset(&mut self) {
        for condition in &mut self.items {
            condition.reset();
        }
    }

    pub fn describe(&self) -> String {
        match self.items.as_slice() {
            [] => String::from("always"),
            [single] => single.describe(),
            items => {
                let parts: Vec<String> = items.iter().map(|c| c.describe()).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

impl<S: State, E> fmt::Debug for Conditions<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Conditions").field(&self.describe()).finish()
    }
}
