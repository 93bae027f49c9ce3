//! Conditions that query the active states of the owning machine.

use crate::core::{ActiveStates, Condition, State};

/// Met when every listed state is active.
#[derive(Clone, Debug)]
pub struct StatesActive<S: State> {
    states: Vec<S>,
}

impl<S: State> StatesActive<S> {
    pub fn new(states: impl IntoIterator<Item = S>) -> Self {
        Self {
            states: states.into_iter().collect(),
        }
    }
}

impl<S: State, E> Condition<S, E> for StatesActive<S> {
    fn is_met(&self, active: &ActiveStates<S>) -> bool {
        active.contains_all(&self.states)
    }

    fn describe(&self) -> String {
        format!("active {:?}", self.states)
    }
}

/// Met when none of the listed states is active.
#[derive(Clone, Debug)]
pub struct StatesInactive<S: State> {
    states: Vec<S>,
}

impl<S: State> StatesInactive<S> {
    pub fn new(states: impl IntoIterator<Item = S>) -> Self {
        Self {
            states: states.into_iter().collect(),
        }
    }
}

impl<S: State, E> Condition<S, E> for StatesInactive<S> {
    fn is_met(&self, active: &ActiveStates<S>) -> bool {
        active.contains_none(&self.states)
    }

    fn describe(&self) -> String {
        format!("inactive {:?}", self.states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(states: &[char]) -> ActiveStates<char> {
        let mut active = ActiveStates::new();
        for state in states {
            active.insert(*state);
        }
        active
    }

    #[test]
    fn states_active_requires_all() {
        let condition = StatesActive::new(['a', 'b']);

        assert!(Condition::<char, ()>::is_met(&condition, &active(&['a', 'b', 'c'])));
        assert!(!Condition::<char, ()>::is_met(&condition, &active(&['a'])));
    }

    #[test]
    fn states_inactive_requires_none() {
        let condition = StatesInactive::new(['a', 'b']);

        assert!(Condition::<char, ()>::is_met(&condition, &active(&['c'])));
        assert!(!Condition::<char, ()>::is_met(&condition, &active(&['b', 'c'])));
    }

    #[test]
    fn empty_lists_are_trivially_met() {
        let all: StatesActive<char> = StatesActive::new([]);
        let none: StatesInactive<char> = StatesInactive::new([]);

        assert!(Condition::<char, ()>::is_met(&all, &active(&['x'])));
        assert!(Condition::<char, ()>::is_met(&none, &active(&['x'])));
    }
}
