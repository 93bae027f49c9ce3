//! Owned, read-only snapshots of a machine's structure.
//!
//! Diagram exporters and other diagnostics work on these copies, never on
//! the live collections inside the machine.

use super::transition::Transition;
use crate::core::State;
use serde::{Deserialize, Serialize};

/// Summary of one transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionInfo<S, P> {
    pub source: S,
    pub destination: S,
    pub priority: P,
    /// Human readable description of the condition conjunction.
    pub conditions: String,
    /// Number of actions run when the transition fires.
    pub actions: usize,
}

impl<S: State, P: Clone> TransitionInfo<S, P> {
    pub(crate) fn of<E>(transition: &Transition<S, E, P>) -> Self {
        Self {
            source: transition.source().clone(),
            destination: transition.destination().clone(),
            priority: transition.priority().clone(),
            conditions: transition.conditions().describe(),
            actions: transition.actions().len(),
        }
    }
}

/// Start states, end states and every transition, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure<S, P> {
    pub start_states: Vec<S>,
    pub end_states: Vec<S>,
    pub transitions: Vec<TransitionInfo<S, P>>,
}

impl<S: PartialEq, P> Structure<S, P> {
    /// States with at least one outgoing transition, in declaration order.
    pub fn source_states(&self) -> Vec<&S> {
        let mut sources: Vec<&S> = Vec::new();
        for transition in &self.transitions {
            if !sources.contains(&&transition.source) {
                sources.push(&transition.source);
            }
        }
        sources
    }
}
