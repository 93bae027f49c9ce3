//! Polystate: a non-deterministic state machine engine
//!
//! Several states can be active at the same time. Transitions leave a source
//! state when their conditions are met, and a single event or poll keeps
//! firing transitions until the machine settles.
//!
//! # Core Concepts
//!
//! - **State**: any `Clone + Eq + Hash + Debug` value identifies a state
//! - **Condition**: a guard that may react to events and is reset whenever its
//!   source state is entered
//! - **Action**: a side effect run on entry, on exit or while a transition fires
//! - **Priority**: per source state, only the most urgent met transitions fire
//!
//! # Example
//!
//! ```rust
//! use polystate::builder::MachineBuilder;
//! use polystate::core::{log, Priority};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
//! enum Light {
//!     Red,
//!     Green,
//!     Yellow,
//! }
//!
//! let mut builder = MachineBuilder::new(Priority::Normal);
//! builder
//!     .state(Light::Red)
//!     .start()
//!     .on("next")
//!     .action(log("red to green"))
//!     .then(Light::Green);
//! builder.state(Light::Green).on("next").then(Light::Yellow);
//! builder.state(Light::Yellow).always().then(Light::Red);
//!
//! let mut machine = builder.build();
//! machine.handle_event(&"next");
//! assert!(machine.is_active(&Light::Green));
//!
//! // Yellow immediately moves on to Red within the same call.
//! machine.handle_event(&"next");
//! assert!(machine.is_active(&Light::Red));
//! ```

pub mod builder;
pub mod conditions;
pub mod core;
pub mod dot;
pub mod machine;
pub mod task;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder, TransitionBuilder};
pub use core::{Action, ActionChain, ActiveStates, Condition, Conditions, Priority, State};
pub use machine::{StateMachine, Transition};
