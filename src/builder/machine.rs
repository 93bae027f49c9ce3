//! State-oriented builder for whole machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::conditions::{Always, OnAnyEvent, OnEvent};
use crate::core::{Action, ActionChain, Condition, Conditions, State};
use crate::machine::{StateMachine, Transition};
use std::fmt::Debug;
use tracing::debug;

type ConditionFactory<S, E> = Box<dyn Fn() -> Box<dyn Condition<S, E>>>;

/// Builder that describes a machine state by state.
///
/// Conditions are stateful and owned by exactly one transition, so they are
/// given as factories: a declaration covering several source states creates
/// fresh conditions for each of them. Actions are shared between those
/// transitions.
///
/// # Example
///
/// ```rust
/// use polystate::builder::MachineBuilder;
/// use polystate::core::Priority;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Game { Intro, Menu, Level, Exit }
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Input { Done, Start, Escape }
///
/// let mut builder = MachineBuilder::new(Priority::Normal);
/// builder.state(Game::Intro).start().on(Input::Done).then(Game::Menu);
/// builder
///     .state(Game::Menu)
///     .on(Input::Start)
///     .then(Game::Level)
///     .on(Input::Escape)
///     .then(Game::Exit);
/// builder.state(Game::Exit).end();
/// let mut machine = builder.build();
///
/// machine.handle_event(&Input::Done);
/// assert!(machine.is_active(&Game::Menu));
/// machine.handle_event(&Input::Escape);
/// assert!(machine.is_finished());
/// ```
pub struct MachineBuilder<S: State, E, P: Ord + Clone + Debug> {
    machine: StateMachine<S, E, P>,
    default_priority: P,
}

impl<S: State, E, P: Ord + Clone + Debug> MachineBuilder<S, E, P> {
    /// Create a builder whose transitions get `default_priority` unless told
    /// otherwise.
    pub fn new(default_priority: P) -> Self {
        Self {
            machine: StateMachine::new(),
            default_priority,
        }
    }

    /// Start describing a single state.
    pub fn state(&mut self, state: S) -> StateDef<'_, S, E, P> {
        self.states([state])
    }

    /// Start describing several states at once.
    pub fn states(&mut self, states: impl IntoIterator<Item = S>) -> StateDef<'_, S, E, P> {
        let mut sources: Vec<S> = Vec::new();
        for state in states {
            if !sources.contains(&state) {
                sources.push(state);
            }
        }
        StateDef {
            builder: self,
            sources,
        }
    }

    /// Add a transition assembled with a [`TransitionBuilder`].
    /// The builder's default priority fills in a missing priority.
    pub fn transition(
        &mut self,
        builder: TransitionBuilder<S, E, P>,
    ) -> Result<&mut Self, BuildError> {
        let transition = builder
            .default_priority(self.default_priority.clone())
            .build()?;
        self.machine.add_transition(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(&mut self, transition: Transition<S, E, P>) -> &mut Self {
        self.machine.add_transition(transition);
        self
    }

    /// Finish construction. The machine is reset, so start states are
    /// entered and their conditions are armed.
    pub fn build(self) -> StateMachine<S, E, P> {
        let mut machine = self.machine;
        machine.reset();
        machine
    }
}

/// Describes one or more states of a [`MachineBuilder`].
pub struct StateDef<'b, S: State, E, P: Ord + Clone + Debug> {
    builder: &'b mut MachineBuilder<S, E, P>,
    sources: Vec<S>,
}

impl<'b, S: State, E, P: Ord + Clone + Debug> StateDef<'b, S, E, P> {
    /// Leave some states out of this declaration.
    pub fn except(mut self, states: impl IntoIterator<Item = S>) -> Self {
        for state in states {
            self.sources.retain(|source| *source != state);
        }
        self
    }

    /// Mark the states as start states.
    pub fn start(mut self) -> Self {
        for state in &self.sources {
            self.builder.machine.add_start_state(state.clone());
        }
        self
    }

    /// Mark the states as end states.
    pub fn end(mut self) -> Self {
        for state in &self.sources {
            self.builder.machine.add_end_state(state.clone());
        }
        self
    }

    /// Run `action` whenever one of the states is entered.
    pub fn on_entry<A>(mut self, action: A) -> Self
    where
        A: Action + 'static,
    {
        let chain = ActionChain::new().with(action);
        for state in &self.sources {
            debug!(?state, "create entry action");
            self.builder.machine.add_entry_actions(state.clone(), &chain);
        }
        self
    }

    /// Run `action` whenever one of the states is exited.
    pub fn on_exit<A>(mut self, action: A) -> Self
    where
        A: Action + 'static,
    {
        let chain = ActionChain::new().with(action);
        for state in &self.sources {
            debug!(?state, "create exit action");
            self.builder.machine.add_exit_actions(state.clone(), &chain);
        }
        self
    }

    /// Transition on a specific event.
    pub fn on(self, event: E) -> TransitionDef<'b, S, E, P>
    where
        E: Clone + PartialEq + Debug + 'static,
    {
        self.when(move || OnEvent::new(event.clone()))
    }

    /// Transition on any of several events.
    pub fn on_any(self, events: impl IntoIterator<Item = E>) -> TransitionDef<'b, S, E, P>
    where
        E: Clone + PartialEq + Debug + 'static,
    {
        let events: Vec<E> = events.into_iter().collect();
        self.when(move || OnAnyEvent::new(events.clone()))
    }

    /// Transition as soon as the state is active.
    pub fn always(self) -> TransitionDef<'b, S, E, P> {
        self.when(|| Always)
    }

    /// Transition guarded by conditions created from `factory`.
    pub fn when<F, C>(self, factory: F) -> TransitionDef<'b, S, E, P>
    where
        F: Fn() -> C + 'static,
        C: Condition<S, E> + 'static,
    {
        TransitionDef {
            state: self,
            factories: Vec::new(),
            actions: ActionChain::new(),
            priority: None,
        }
        .and_when(factory)
    }
}

/// Describes a transition leaving every state of a [`StateDef`].
pub struct TransitionDef<'b, S: State, E, P: Ord + Clone + Debug> {
    state: StateDef<'b, S, E, P>,
    factories: Vec<ConditionFactory<S, E>>,
    actions: ActionChain,
    priority: Option<P>,
}

impl<'b, S: State, E, P: Ord + Clone + Debug> TransitionDef<'b, S, E, P> {
    /// Add another condition to the conjunction.
    pub fn and_when<F, C>(mut self, factory: F) -> Self
    where
        F: Fn() -> C + 'static,
        C: Condition<S, E> + 'static,
    {
        self.factories
            .push(Box::new(move || Box::new(factory()) as Box<dyn Condition<S, E>>));
        self
    }

    /// Run `action` when the transition fires.
    pub fn action<A>(mut self, action: A) -> Self
    where
        A: Action + 'static,
    {
        self.actions.push(action);
        self
    }

    /// Override the builder's default priority.
    pub fn priority(mut self, priority: P) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Add the transition to `destination` for every source state, and
    /// continue describing the same states.
    pub fn then(self, destination: S) -> StateDef<'b, S, E, P> {
        let TransitionDef {
            mut state,
            factories,
            actions,
            priority,
        } = self;
        let priority = priority.unwrap_or_else(|| state.builder.default_priority.clone());

        for source in &state.sources {
            let mut conditions = Conditions::new();
            for factory in &factories {
                conditions.push_boxed(factory());
            }
            state.builder.machine.add_transition(Transition::new(
                source.clone(),
                destination.clone(),
                conditions,
                priority.clone(),
                actions.clone(),
            ));
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{active, after, inactive};
    use crate::core::{Priority, PrioritySequence};
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Light {
        Red,
        Yellow,
        Green,
        Off,
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Switch {
        Next,
        PowerDown,
    }

    fn trace(trace: &Rc<RefCell<String>>, signature: &'static str) -> impl FnMut() + 'static {
        let trace = Rc::clone(trace);
        move || trace.borrow_mut().push_str(signature)
    }

    #[test]
    fn build_resets_the_machine() {
        let log = Rc::new(RefCell::new(String::new()));
        let mut builder: MachineBuilder<Light, Switch, Priority> =
            MachineBuilder::new(Priority::Normal);
        builder.state(Light::Red).start().on_entry(trace(&log, "red"));

        let machine = builder.build();

        assert!(machine.is_active(&Light::Red));
        assert_eq!(*log.borrow(), "red");
    }

    #[test]
    fn multi_state_declaration_creates_one_transition_per_source() {
        let mut builder: MachineBuilder<Light, Switch, Priority> =
            MachineBuilder::new(Priority::Normal);
        builder
            .states([Light::Red, Light::Yellow, Light::Green, Light::Off])
            .except([Light::Off])
            .on(Switch::PowerDown)
            .then(Light::Off);
        builder.state(Light::Off).end();

        let machine = builder.build();

        assert_eq!(
            machine.source_states(),
            HashSet::from([Light::Red, Light::Yellow, Light::Green])
        );
        assert!(machine.transitions_for(&Light::Off).is_empty());
    }

    #[test]
    fn one_event_fires_the_transition_of_every_source() {
        let mut builder: MachineBuilder<Light, Switch, Priority> =
            MachineBuilder::new(Priority::Normal);
        builder.states([Light::Red, Light::Green]).start();
        builder
            .states([Light::Red, Light::Green])
            .on(Switch::Next)
            .then(Light::Yellow);
        builder.state(Light::Yellow).on(Switch::Next).then(Light::Red);

        let mut machine = builder.build();
        assert_eq!(machine.handle_event(&Switch::Next), 2);

        assert_eq!(machine.active_states(), HashSet::from([Light::Yellow]));
    }

    #[test]
    fn shared_actions_run_once_per_firing_transition() {
        let log = Rc::new(RefCell::new(String::new()));
        let mut builder: MachineBuilder<Light, Switch, Priority> =
            MachineBuilder::new(Priority::Normal);
        builder.states([Light::Red, Light::Green]).start();
        builder
            .states([Light::Red, Light::Green])
            .on(Switch::PowerDown)
            .action(trace(&log, "x"))
            .then(Light::Off);

        let mut machine = builder.build();
        machine.handle_event(&Switch::PowerDown);

        assert_eq!(*log.borrow(), "xx");
        assert!(machine.is_active(&Light::Off));
    }

    #[test]
    fn chained_declarations_on_the_same_state() {
        let mut builder: MachineBuilder<Light, Switch, Priority> =
            MachineBuilder::new(Priority::Normal);
        builder
            .state(Light::Red)
            .start()
            .on(Switch::Next)
            .then(Light::Green)
            .on(Switch::PowerDown)
            .then(Light::Off);

        let mut machine = builder.build();
        machine.handle_event(&Switch::PowerDown);

        assert_eq!(machine.active_states(), HashSet::from([Light::Off]));
    }

    #[test]
    fn state_queries_guard_transitions() {
        let mut builder: MachineBuilder<Light, Switch, Priority> =
            MachineBuilder::new(Priority::Normal);
        builder.states([Light::Red, Light::Green]).start();
        builder
            .state(Light::Red)
            .when(active([Light::Yellow]))
            .then(Light::Off);
        builder
            .state(Light::Green)
            .when(inactive([Light::Red]))
            .then(Light::Yellow);

        let mut machine = builder.build();
        assert_eq!(machine.poll(), 0);

        // Once Red is gone, Green moves to Yellow.
        power_down_red(&mut machine);
        assert!(machine.is_active(&Light::Yellow));
    }

    fn power_down_red(machine: &mut StateMachine<Light, Switch, Priority>) {
        machine.add_transition(
            TransitionBuilder::new()
                .from(Light::Red)
                .to(Light::Off)
                .when(crate::conditions::OnEvent::new(Switch::PowerDown))
                .priority(Priority::Highest)
                .build()
                .unwrap(),
        );
        machine.handle_event(&Switch::PowerDown);
    }

    #[test]
    fn timer_factory_creates_fresh_timers() {
        let mut builder: MachineBuilder<Light, Switch, Priority> =
            MachineBuilder::new(Priority::Normal);
        builder.state(Light::Red).start().when(after(60_000)).then(Light::Green);

        let mut machine = builder.build();

        assert_eq!(machine.poll(), 0);
        assert!(machine.is_active(&Light::Red));
        assert_eq!(
            machine.transitions_for(&Light::Red)[0].conditions,
            "after 60000ms"
        );
    }

    #[test]
    fn transition_builder_gets_default_priority() {
        let mut builder: MachineBuilder<Light, Switch, Priority> =
            MachineBuilder::new(Priority::Low);
        builder
            .transition(TransitionBuilder::new().from(Light::Red).to(Light::Green))
            .unwrap();

        let machine = builder.build();

        assert_eq!(
            machine.transitions_for(&Light::Red)[0].priority,
            Priority::Low
        );
    }

    #[test]
    fn transition_builder_errors_propagate() {
        let mut builder: MachineBuilder<Light, Switch, Priority> =
            MachineBuilder::new(Priority::Low);

        let result = builder.transition(TransitionBuilder::new().to(Light::Green));

        assert!(result.is_err());
    }

    #[test]
    fn priority_sequence_makes_declaration_order_win() {
        let log = Rc::new(RefCell::new(String::new()));
        let mut sequence = PrioritySequence::new();
        let mut builder: MachineBuilder<Light, Switch, u32> = MachineBuilder::new(u32::MAX);
        builder.state(Light::Red).start();
        builder
            .state(Light::Red)
            .always()
            .priority(sequence.next_priority())
            .action(trace(&log, "first"))
            .then(Light::Green)
            .always()
            .priority(sequence.next_priority())
            .action(trace(&log, "second"))
            .then(Light::Yellow);

        let mut machine = builder.build();
        machine.poll();

        assert_eq!(*log.borrow(), "first");
        assert_eq!(machine.active_states(), HashSet::from([Light::Green]));
    }
}
