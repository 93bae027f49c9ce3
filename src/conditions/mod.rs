//! Ready-made condition variants.
//!
//! | Condition | Met when | Reacts to events | Reset |
//! |---|---|---|---|
//! | [`Always`] | always | no | - |
//! | [`Never`] | never | no | - |
//! | [`OnEvent`] / [`OnAnyEvent`] | a matching event arrived since the last reset | latches | clears latch |
//! | [`After`] | the clock passed the reset time plus a delay | no | arms deadline |
//! | [`StatesActive`] / [`StatesInactive`] | all listed states active / none active | no | - |
//! | [`SubMachine`] | an embedded machine finished | forwards events | resets embedded machine |
//!
//! Closure-backed guards live in [`crate::core::Guard`], and the completion
//! of a background task is exposed by [`crate::task::TaskFinished`].

mod basic;
mod event;
mod states;
mod timer;

pub use basic::{Always, Never};
pub use event::{Embedded, EventIn, EventIs, EventMatcher, Latch, OnAnyEvent, OnEvent, SubMachine};
pub use states::{StatesActive, StatesInactive};
pub use timer::{After, Clock, ManualClock, SystemClock};
