//! Constant conditions.

use crate::core::{ActiveStates, Condition, State};

/// Always met. Transitions guarded only by `Always` fire as soon as their
/// source state is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Always;

impl<S: State, E> Condition<S, E> for Always {
    fn is_met(&self, _active: &ActiveStates<S>) -> bool {
        true
    }

    fn describe(&self) -> String {
        String::from("always")
    }
}

/// Never met.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Never;

impl<S: State, E> Condition<S, E> for Never {
    fn is_met(&self, _active: &ActiveStates<S>) -> bool {
        false
    }

    fn describe(&self) -> String {
        String::from("never")
    }
}
