//! Guarded, prioritized edges between states.

use crate::core::{ActionChain, Conditions, State};
use std::cmp::Ordering;
use std::fmt;

/// Identity of a transition inside one machine, assigned when it is added.
pub(crate) type TransitionId = usize;

/// A conditional transition between two states.
///
/// Immutable once built: every field is a required constructor argument.
/// Use [`crate::builder::TransitionBuilder`] to assemble one field by field
/// with validation.
///
/// # Example
///
/// ```rust
/// use polystate::conditions::OnEvent;
/// use polystate::core::{ActionChain, Conditions, Priority};
/// use polystate::machine::Transition;
///
/// let transition: Transition<char, &str, Priority> = Transition::new(
///     'a',
///     'b',
///     Conditions::new().with(OnEvent::new("next")),
///     Priority::Normal,
///     ActionChain::new(),
/// );
///
/// assert_eq!(transition.source(), &'a');
/// assert_eq!(transition.destination(), &'b');
/// ```
pub struct Transition<S: State, E, P> {
    source: S,
    destination: S,
    conditions: Conditions<S, E>,
    priority: P,
    actions: ActionChain,
    pub(crate) id: TransitionId,
}

impl<S: State, E, P> Transition<S, E, P> {
    pub fn new(
        source: S,
        destination: S,
        conditions: Conditions<S, E>,
        priority: P,
        actions: ActionChain,
    ) -> Self {
        Self {
            source,
            destination,
            conditions,
            priority,
            actions,
            id: 0,
        }
    }

    /// The state that must be active for this transition to fire.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The state entered when this transition fires.
    pub fn destination(&self) -> &S {
        &self.destination
    }

    /// The conjunction that must be met for this transition to fire.
    pub fn conditions(&self) -> &Conditions<S, E> {
        &self.conditions
    }

    pub(crate) fn conditions_mut(&mut self) -> &mut Conditions<S, E> {
        &mut self.conditions
    }

    /// If this transition fires, lower priority transitions from the same
    /// source state may not fire in the same round.
    pub fn priority(&self) -> &P {
        &self.priority
    }

    /// Executed when this transition fires.
    pub fn actions(&self) -> &ActionChain {
        &self.actions
    }
}

impl<S: State, E, P: Ord> Transition<S, E, P> {
    /// Compare on priority alone. `Less` means `self` fires first.
    pub fn cmp_priority(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority)
    }
}

impl<S: State, E, P: fmt::Debug> fmt::Debug for Transition<S, E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("conditions", &self.conditions.describe())
            .field("priority", &self.priority)
            .field("actions", &self.actions.len())
            .finish()
    }
}

impl<S: State, E, P: fmt::Debug> fmt::Display for Transition<S, E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transition from {:?} to {:?}, condition {}, {} action(s), priority {:?}",
            self.source,
            self.destination,
            self.conditions.describe(),
            self.actions.len(),
            self.priority
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{Always, Never};
    use crate::core::Priority;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        Start,
        Middle,
    }

    fn transition(priority: Priority) -> Transition<TestState, (), Priority> {
        Transition::new(
            TestState::Start,
            TestState::Middle,
            Conditions::new().with(Always),
            priority,
            ActionChain::new(),
        )
    }

    #[test]
    fn accessors_return_fields() {
        let t = transition(Priority::High);

        assert_eq!(t.source(), &TestState::Start);
        assert_eq!(t.destination(), &TestState::Middle);
        assert_eq!(t.priority(), &Priority::High);
        assert_eq!(t.conditions().len(), 1);
        assert!(t.actions().is_empty());
    }

    #[test]
    fn orders_by_priority() {
        let high = transition(Priority::High);
        let low = transition(Priority::Low);

        assert_eq!(high.cmp_priority(&low), Ordering::Less);
        assert_eq!(low.cmp_priority(&high), Ordering::Greater);
        assert_eq!(high.cmp_priority(&transition(Priority::High)), Ordering::Equal);
    }

    #[test]
    fn display_mentions_endpoints_and_condition() {
        let t: Transition<TestState, (), Priority> = Transition::new(
            TestState::Start,
            TestState::Middle,
            Conditions::new().with(Never),
            Priority::Low,
            ActionChain::new(),
        );

        assert_eq!(
            t.to_string(),
            "transition from Start to Middle, condition never, 0 action(s), priority Low"
        );
    }
}
