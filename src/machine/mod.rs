//! The evaluation engine.
//!
//! - **Transitions**: immutable, guarded, prioritized edges with actions
//! - **State Machine**: owns the active states and the transition table, and
//!   drives both to a fixpoint on every poll
//! - **Structure**: owned snapshots for diagnostics and diagrams

#[allow(clippy::module_inception)]
mod machine;
mod structure;
mod transition;

pub use machine::StateMachine;
pub use structure::{Structure, TransitionInfo};
pub use transition::Transition;
