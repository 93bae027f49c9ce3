//! State identity and the live set of active states.
//!
//! The engine never inspects a state beyond equality and hashing, so any
//! value that satisfies the `State` bounds can be used: enums, chars,
//! strings, integers.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// Implemented automatically for every type that is `Clone + Eq + Hash + Debug`.
///
/// # Example
///
/// ```rust
/// use polystate::core::State;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum TaskState {
///     Pending,
///     Running,
///     Complete,
/// }
///
/// fn assert_state<S: State>(_: &S) {}
///
/// assert_state(&TaskState::Pending);
/// assert_state(&'A');
/// assert_state(&"loading");
/// ```
pub trait State: Clone + Eq + Hash + Debug {}

impl<T> State for T where T: Clone + Eq + Hash + Debug {}

/// Insertion-ordered set of the currently active states.
///
/// Guards receive a shared reference to this set when they are evaluated.
/// Iteration yields states in the order they were activated, which keeps
/// the order of side effects stable from one run to the next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveStates<S: State> {
    states: Vec<S>,
}

impl<S: State> Default for ActiveStates<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> ActiveStates<S> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    /// Whether `state` is active.
    pub fn contains(&self, state: &S) -> bool {
        self.states.contains(state)
    }

    /// Whether every state yielded by `states` is active.
    pub fn contains_all<'a, I>(&self, states: I) -> bool
    where
        I: IntoIterator<Item = &'a S>,
        S: 'a,
    {
        states.into_iter().all(|state| self.contains(state))
    }

    /// Whether none of the states yielded by `states` is active.
    pub fn contains_none<'a, I>(&self, states: I) -> bool
    where
        I: IntoIterator<Item = &'a S>,
        S: 'a,
    {
        !states.into_iter().any(|state| self.contains(state))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterate in activation order.
    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.states.iter()
    }

    /// Owned, unordered copy of the set.
    pub fn to_set(&self) -> HashSet<S> {
        self.states.iter().cloned().collect()
    }

    /// Add `state`; returns `false` if it was already present.
    pub(crate) fn insert(&mut self, state: S) -> bool {
        if self.contains(&state) {
            return false;
        }
        self.states.push(state);
        true
    }

    /// Remove `state`; returns `false` if it was not present.
    pub(crate) fn remove(&mut self, state: &S) -> bool {
        match self.states.iter().position(|s| s == state) {
            Some(index) => {
                self.states.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.states.clear();
    }
}

impl<'a, S: State> IntoIterator for &'a ActiveStates<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
