//! Builder API for ergonomic state machine construction.
//!
//! Builders only use the machine's public mutation methods, so anything
//! they do can also be done by hand or by an importer for some other
//! format.
//!
//! - [`TransitionBuilder`] assembles a single transition and validates it.
//! - [`MachineBuilder`] describes a machine state by state.
//! - [`read_scxml`] imports a machine from an SCXML document.
//! - [`actions!`](macro@crate::actions) and [`conditions!`](macro@crate::conditions)
//!   build chains and conjunctions from lists.

pub mod error;
pub mod machine;
pub mod macros;
pub mod scxml;
pub mod transition;

pub use error::{BuildError, ScxmlError, TransitionField};
pub use machine::{MachineBuilder, StateDef, TransitionDef};
pub use scxml::{read_scxml, read_scxml_into, ScxmlInterpreter};
pub use transition::TransitionBuilder;

use crate::conditions::{After, Clock, StatesActive, StatesInactive};
use crate::core::State;
use std::time::Duration;

/// Factory for a condition met when all `states` are active.
///
/// # Example
///
/// ```
/// use polystate::builder::{active, MachineBuilder};
/// use polystate::core::Priority;
///
/// let mut builder: MachineBuilder<char, (), Priority> = MachineBuilder::new(Priority::Normal);
/// builder.states(['a', 'b']).start();
/// builder.state('a').when(active(['b'])).then('c');
///
/// let mut machine = builder.build();
/// machine.poll();
/// assert!(machine.is_active(&'c'));
/// ```
pub fn active<S>(states: impl IntoIterator<Item = S>) -> impl Fn() -> StatesActive<S> + 'static
where
    S: State + 'static,
{
    let states: Vec<S> = states.into_iter().collect();
    move || StatesActive::new(states.clone())
}

/// Factory for a condition met when none of `states` is active.
pub fn inactive<S>(
    states: impl IntoIterator<Item = S>,
) -> impl Fn() -> StatesInactive<S> + 'static
where
    S: State + 'static,
{
    let states: Vec<S> = states.into_iter().collect();
    move || StatesInactive::new(states.clone())
}

/// Factory for a wall clock timer of `milliseconds`.
pub fn after(milliseconds: u64) -> impl Fn() -> After + 'static {
    move || After::millis(milliseconds)
}

/// Factory for a timer of `milliseconds` that reads `clock`.
///
/// Every created timer gets its own clone of `clock`, so a shared clock such
/// as [`ManualClock`](crate::conditions::ManualClock) drives all of them.
pub fn after_with<C>(clock: C, milliseconds: u64) -> impl Fn() -> After<C> + 'static
where
    C: Clock + Clone + 'static,
{
    move || After::with_clock(Duration::from_millis(milliseconds), clock.clone())
}
