//! Core building blocks of the engine.
//!
//! This module contains the vocabulary the machine is written in:
//! - State identity via the blanket `State` trait, and the `ActiveStates` set
//! - Priorities and the `PrioritySequence` counter
//! - The `Condition` guard interface and its `Conditions` conjunction
//! - Closure-backed `Guard`s
//! - `Action`s and ordered `ActionChain`s

mod action;
mod condition;
mod guard;
mod priority;
mod state;

pub use action::{log, Action, ActionChain, LogAction, SharedAction};
pub use condition::{Condition, Conditions};
pub use guard::Guard;
pub use priority::{Priority, PrioritySequence};
pub use state::{ActiveStates, State};
