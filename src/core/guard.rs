//! Closure-backed guards.
//!
//! Guards are pure predicates over the active states of the machine that
//! owns them. They ignore events and have nothing to reset.

use super::condition::Condition;
use super::state::{ActiveStates, State};

/// Pure predicate that determines if a transition can fire.
///
/// # Example
///
/// ```rust
/// use polystate::core::{ActiveStates, Condition, Guard};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Light {
///     Red,
///     Green,
/// }
///
/// let only_when_quiet = Guard::new(|active: &ActiveStates<Light>| active.len() < 2);
/// let active = ActiveStates::new();
///
/// assert!(Condition::<Light, ()>::is_met(&only_when_quiet, &active));
/// ```
pub struct Guard<S: State> {
    predicate: Box<dyn Fn(&ActiveStates<S>) -> bool>,
    label: String,
}

impl<S: State> Guard<S> {
    /// Create a guard from a predicate.
    ///
    /// The predicate must be deterministic and must not mutate anything the
    /// machine depends on.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&ActiveStates<S>) -> bool + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            label: String::from("guard"),
        }
    }

    /// Set the label shown in diagrams.
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Evaluate the predicate.
    pub fn check(&self, active: &ActiveStates<S>) -> bool {
        (self.predicate)(active)
    }
}

impl<S: State, E> Condition<S, E> for Guard<S> {
    fn is_met(&self, active: &ActiveStates<S>) -> bool {
        self.check(active)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
