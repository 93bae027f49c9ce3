//! Builder for constructing transitions field by field.

use crate::builder::error::{BuildError, TransitionField};
use crate::core::{Action, ActionChain, Condition, Conditions, State};
use crate::machine::Transition;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing transitions with a fluent API.
///
/// Source, destination and priority are mandatory. Conditions and actions
/// default to empty, which means "always met" and "no side effect".
///
/// # Example
///
/// ```rust
/// use polystate::builder::TransitionBuilder;
/// use polystate::conditions::OnEvent;
/// use polystate::core::Priority;
/// use polystate::machine::Transition;
///
/// let transition: Transition<&str, &str, Priority> = TransitionBuilder::new()
///     .from("menu")
///     .to("level")
///     .when(OnEvent::new("start"))
///     .priority(Priority::High)
///     .build()
///     .unwrap();
///
/// assert_eq!(transition.destination(), &"level");
/// ```
pub struct TransitionBuilder<S: State, E, P> {
    source: Option<S>,
    destination: Option<S>,
    conditions: Conditions<S, E>,
    priority: Option<P>,
    actions: ActionChain,
}

impl<S: State, E, P> TransitionBuilder<S, E, P> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            source: None,
            destination: None,
            conditions: Conditions::new(),
            priority: None,
            actions: ActionChain::new(),
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: S) -> Self {
        self.source = Some(state);
        self
    }

    /// Set the destination state (required).
    pub fn to(mut self, state: S) -> Self {
        self.destination = Some(state);
        self
    }

    /// Add a condition to the conjunction.
    pub fn when<C>(mut self, condition: C) -> Self
    where
        C: Condition<S, E> + 'static,
    {
        self.conditions.push(condition);
        self
    }

    /// Add every condition of an existing conjunction.
    pub fn conditions(mut self, conditions: Conditions<S, E>) -> Self {
        self.conditions.append(conditions);
        self
    }

    /// Set the priority (required).
    pub fn priority(mut self, priority: P) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Use `priority` unless one was set explicitly.
    pub fn default_priority(mut self, priority: P) -> Self {
        if self.priority.is_none() {
            self.priority = Some(priority);
        }
        self
    }

    /// Add an action.
    pub fn action<A>(mut self, action: A) -> Self
    where
        A: Action + 'static,
    {
        self.actions.push(action);
        self
    }

    /// Add every action of an existing chain.
    pub fn actions(mut self, actions: &ActionChain) -> Self {
        self.actions.append(actions);
        self
    }

    /// Build the transition, reporting every missing mandatory field.
    pub fn build(self) -> Result<Transition<S, E, P>, BuildError> {
        match (self.source, self.destination, self.priority) {
            (Some(source), Some(destination), Some(priority)) => Ok(Transition::new(
                source,
                destination,
                self.conditions,
                priority,
                self.actions,
            )),
            (source, destination, priority) => Err(BuildError::IncompleteTransition {
                missing: missing_fields(
                    source.is_some(),
                    destination.is_some(),
                    priority.is_some(),
                ),
            }),
        }
    }
}

impl<S: State, E, P> Default for TransitionBuilder<S, E, P> {
    fn default() -> Self {
        Self::new()
    }
}

fn require(
    present: bool,
    field: TransitionField,
) -> Validation<(), NonEmptyVec<TransitionField>> {
    if present {
        Validation::success(())
    } else {
        Validation::fail(field)
    }
}

/// Accumulate ALL missing fields instead of stopping at the first.
fn missing_fields(source: bool, destination: bool, priority: bool) -> Vec<TransitionField> {
    let checks = vec![
        require(source, TransitionField::Source),
        require(destination, TransitionField::Destination),
        require(priority, TransitionField::Priority),
    ];

    match Validation::all_vec(checks) {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().copied().collect(),
    }
}
