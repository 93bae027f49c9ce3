//! The state machine engine.

use super::structure::{Structure, TransitionInfo};
use super::transition::{Transition, TransitionId};
use crate::core::{ActionChain, ActiveStates, State};
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Debug};
use tracing::{debug, trace, warn};

/// A non-deterministic state machine with multiple active states.
///
/// - It allows multiple start states, active states and end states.
/// - States and their transitions do not have to form a single graph.
/// - Each state has a chain of entry and exit actions; each transition has
///   a chain of actions.
/// - Transitions carry a priority. Per source state, the highest priority
///   tier with a met condition fires, and all of its members fire together.
/// - Nothing is compiled or validated ahead of time.
///
/// `S` is the state type, `E` the event type and `P` the priority type.
///
/// # Example
///
/// ```rust
/// use polystate::conditions::OnEvent;
/// use polystate::core::{ActionChain, Conditions, Priority};
/// use polystate::machine::{StateMachine, Transition};
///
/// let mut machine: StateMachine<&str, &str, Priority> = StateMachine::new();
/// machine.add_start_state("idle");
/// machine.add_end_state("done");
/// machine.add_transition(Transition::new(
///     "idle",
///     "done",
///     Conditions::new().with(OnEvent::new("finish")),
///     Priority::Normal,
///     ActionChain::new(),
/// ));
/// machine.reset();
///
/// assert!(machine.is_active(&"idle"));
/// machine.handle_event(&"finish");
/// assert!(machine.is_finished());
/// ```
pub struct StateMachine<S: State, E, P: Ord + Clone + Debug> {
    start_states: Vec<S>,
    end_states: Vec<S>,
    active: ActiveStates<S>,
    transitions: HashMap<S, Vec<Transition<S, E, P>>>,
    entry_actions: HashMap<S, ActionChain>,
    exit_actions: HashMap<S, ActionChain>,
    next_transition_id: TransitionId,
}

impl<S: State, E, P: Ord + Clone + Debug> Default for StateMachine<S, E, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E, P: Ord + Clone + Debug> StateMachine<S, E, P> {
    /// Create an empty machine. Fill it through the mutation methods or with
    /// one of the builders.
    pub fn new() -> Self {
        debug!("new state machine");
        Self {
            start_states: Vec::new(),
            end_states: Vec::new(),
            active: ActiveStates::new(),
            transitions: HashMap::new(),
            entry_actions: HashMap::new(),
            exit_actions: HashMap::new(),
            next_transition_id: 0,
        }
    }

    /// Reset the active states to the start states, entering each of them.
    pub fn reset(&mut self) {
        debug!("reset");
        if self.start_states.is_empty() {
            warn!("state machine does not contain any start states");
        }
        self.active.clear();
        for start_state in self.start_states.clone() {
            self.enter_state(start_state);
        }
    }

    /// Whether `state` is currently active.
    pub fn is_active(&self, state: &S) -> bool {
        self.active.contains(state)
    }

    /// Copy of the active states.
    pub fn active_states(&self) -> HashSet<S> {
        self.active.to_set()
    }

    /// A machine without active states is finished.
    pub fn is_finished(&self) -> bool {
        self.active.is_empty()
    }

    /// Handle an event coming from the application.
    ///
    /// The event goes to the conditions of every transition whose source
    /// state is active, then the machine is polled. Returns the number of
    /// transitions that fired.
    pub fn handle_event(&mut self, event: &E) -> usize {
        debug!(active = self.active.len(), "handle event");
        for source in self.active.iter() {
            if let Some(transitions) = self.transitions.get_mut(source) {
                for transition in transitions.iter_mut() {
                    transition.conditions_mut().handle_event(event);
                }
            }
        }
        self.poll()
    }

    /// Fire transitions until nothing changes any more.
    ///
    /// Each round:
    /// 1. For every active state, scan its transitions from highest to
    ///    lowest priority, skipping those that already fired during this
    ///    call. The first priority with a met transition wins; every met
    ///    transition of that priority fires, lower priorities are not
    ///    considered.
    /// 2. Run the exit actions of all states being left.
    /// 3. Run the actions of all firing transitions.
    /// 4. Enter all destination states.
    ///
    /// Rounds repeat while transitions fire. A transition fires at most once
    /// per call, so loops in the graph cannot make this spin forever.
    ///
    /// Returns the number of transitions that fired.
    pub fn poll(&mut self) -> usize {
        let mut fired_before: HashSet<TransitionId> = HashSet::new();
        let mut fired_total = 0;

        loop {
            let mut states_to_exit: Vec<S> = Vec::new();
            let mut transitions_to_fire: Vec<(S, usize)> = Vec::new();
            let mut states_to_enter: Vec<S> = Vec::new();

            for source in self.active.iter() {
                let Some(transitions) = self.transitions.get(source) else {
                    continue;
                };
                let mut firing_priority: Option<&P> = None;
                for (index, transition) in transitions.iter().enumerate() {
                    if fired_before.contains(&transition.id) {
                        continue;
                    }
                    if let Some(priority) = firing_priority {
                        if transition.priority() != priority {
                            // A higher tier already fires for this source state.
                            break;
                        }
                    }
                    if transition.conditions().is_met(&self.active) {
                        push_unique(&mut states_to_exit, source.clone());
                        transitions_to_fire.push((source.clone(), index));
                        push_unique(&mut states_to_enter, transition.destination().clone());
                        firing_priority = Some(transition.priority());
                    }
                }
            }

            if transitions_to_fire.is_empty() {
                break;
            }

            for state in &states_to_exit {
                self.exit_state(state);
            }
            for (source, index) in &transitions_to_fire {
                let transition = &self.transitions[source][*index];
                debug!(
                    source = ?transition.source(),
                    destination = ?transition.destination(),
                    priority = ?transition.priority(),
                    "fire transition"
                );
                transition.actions().execute();
                fired_before.insert(transition.id);
            }
            for state in states_to_enter {
                self.enter_state(state);
            }

            fired_total += transitions_to_fire.len();
            trace!(fired = transitions_to_fire.len(), "poll round complete");
        }

        fired_total
    }

    fn exit_state(&mut self, state: &S) {
        if self.active.contains(state) {
            debug!(?state, "exit state");
            if let Some(actions) = self.exit_actions.get(state) {
                actions.execute();
            }
            self.active.remove(state);
        }
    }

    fn enter_state(&mut self, state: S) {
        if self.end_states.contains(&state) {
            debug!(?state, "enter end state");
            if let Some(actions) = self.entry_actions.get(&state) {
                actions.execute();
            }
            if self.active.is_empty() {
                debug!("machine is finished");
            }
            return;
        }
        if self.active.insert(state.clone()) {
            debug!(?state, "enter state");
            if let Some(actions) = self.entry_actions.get(&state) {
                actions.execute();
            }
            self.reset_transitions(&state);
        }
    }

    fn reset_transitions(&mut self, source: &S) {
        if let Some(transitions) = self.transitions.get_mut(source) {
            for transition in transitions.iter_mut() {
                transition.conditions_mut().reset();
            }
        }
    }

    // Mutation contract used by builders.

    /// Add a start state and activate it immediately.
    ///
    /// No entry actions run and no conditions are reset; call
    /// [`StateMachine::reset`] once construction is complete for that.
    pub fn add_start_state(&mut self, state: S) {
        debug!(?state, "add start state");
        push_unique(&mut self.start_states, state.clone());
        self.active.insert(state);
    }

    /// Add an end state. Entering it runs its entry actions but never
    /// activates it.
    pub fn add_end_state(&mut self, state: S) {
        debug!(?state, "add end state");
        push_unique(&mut self.end_states, state);
    }

    /// Add a transition. It is placed after every transition from the same
    /// source state with an equal or higher priority.
    pub fn add_transition(&mut self, mut transition: Transition<S, E, P>) {
        debug!(
            source = ?transition.source(),
            destination = ?transition.destination(),
            conditions = %transition.conditions().describe(),
            priority = ?transition.priority(),
            "add transition"
        );
        transition.id = self.next_transition_id;
        self.next_transition_id += 1;

        let transitions = self
            .transitions
            .entry(transition.source().clone())
            .or_default();
        let position = transitions.partition_point(|t| t.priority() <= transition.priority());
        transitions.insert(position, transition);
    }

    /// Append actions executed when `state` is entered.
    pub fn add_entry_actions(&mut self, state: S, actions: &ActionChain) {
        debug!(?state, count = actions.len(), "add entry actions");
        self.entry_actions.entry(state).or_default().append(actions);
    }

    /// Append actions executed when `state` is exited.
    pub fn add_exit_actions(&mut self, state: S, actions: &ActionChain) {
        debug!(?state, count = actions.len(), "add exit actions");
        self.exit_actions.entry(state).or_default().append(actions);
    }

    // Introspection. Everything returned is an owned copy.

    pub fn start_states(&self) -> HashSet<S> {
        self.start_states.iter().cloned().collect()
    }

    pub fn end_states(&self) -> HashSet<S> {
        self.end_states.iter().cloned().collect()
    }

    /// States that have outgoing transitions.
    pub fn source_states(&self) -> HashSet<S> {
        self.transitions.keys().cloned().collect()
    }

    /// Outgoing transitions of `state`, highest priority first. Empty when
    /// the state has none.
    pub fn transitions_for(&self, state: &S) -> Vec<TransitionInfo<S, P>> {
        self.transitions
            .get(state)
            .map(|transitions| transitions.iter().map(TransitionInfo::of).collect())
            .unwrap_or_default()
    }

    /// Snapshot of the whole structure, transitions in declaration order.
    pub fn structure(&self) -> Structure<S, P> {
        let mut transitions: Vec<&Transition<S, E, P>> =
            self.transitions.values().flatten().collect();
        transitions.sort_by_key(|t| t.id);

        Structure {
            start_states: self.start_states.clone(),
            end_states: self.end_states.clone(),
            transitions: transitions.into_iter().map(TransitionInfo::of).collect(),
        }
    }
}

impl<S: State, E, P: Ord + Clone + Debug> Debug for StateMachine<S, E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("active", &self.active)
            .field("start_states", &self.start_states)
            .field("end_states", &self.end_states)
            .field("transitions", &self.next_transition_id)
            .finish()
    }
}

fn push_unique<S: PartialEq>(states: &mut Vec<S>, state: S) {
    if !states.contains(&state) {
        states.push(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{Always, Never, OnEvent};
    use crate::core::{Condition, Conditions, Priority};
    use serde::{Deserialize, Serialize};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum Step {
        A,
        B,
        C,
        D,
        E,
    }

    type Machine = StateMachine<Step, &'static str, Priority>;

    fn trace_action(trace: &Rc<RefCell<String>>, signature: &'static str) -> ActionChain {
        let trace = Rc::clone(trace);
        ActionChain::new().with(move || trace.borrow_mut().push_str(signature))
    }

    fn always(source: Step, destination: Step) -> Transition<Step, &'static str, Priority> {
        Transition::new(
            source,
            destination,
            Conditions::new().with(Always),
            Priority::Normal,
            ActionChain::new(),
        )
    }

    #[test]
    fn reset_enters_start_states() {
        let trace = Rc::new(RefCell::new(String::new()));
        let mut machine = Machine::new();
        machine.add_start_state(Step::A);
        machine.add_entry_actions(Step::A, &trace_action(&trace, "enter-a "));

        machine.reset();

        assert!(machine.is_active(&Step::A));
        assert_eq!(*trace.borrow(), "enter-a ");
    }

    #[test]
    fn no_start_states_means_finished() {
        let mut machine = Machine::new();
        machine.reset();

        assert!(machine.is_finished());
        assert_eq!(machine.poll(), 0);
    }

    #[test]
    fn active_state_without_transitions_is_not_an_error() {
        let mut machine = Machine::new();
        machine.add_start_state(Step::A);
        machine.reset();

        assert_eq!(machine.handle_event(&"anything"), 0);
        assert!(machine.is_active(&Step::A));
    }

    #[test]
    fn firing_order_is_exit_then_transition_then_entry() {
        let trace = Rc::new(RefCell::new(String::new()));
        let mut machine = Machine::new();
        machine.add_start_state(Step::A);
        machine.add_exit_actions(Step::A, &trace_action(&trace, "exit "));
        machine.add_entry_actions(Step::B, &trace_action(&trace, "enter"));
        machine.add_transition(Transition::new(
            Step::A,
            Step::B,
            Conditions::new().with(OnEvent::new("go")),
            Priority::Normal,
            trace_action(&trace, "fire "),
        ));
        machine.reset();

        assert_eq!(machine.handle_event(&"go"), 1);

        assert_eq!(*trace.borrow(), "exit fire enter");
        assert_eq!(machine.active_states(), HashSet::from([Step::B]));
    }

    #[test]
    fn end_state_runs_entry_actions_without_activating() {
        let trace = Rc::new(RefCell::new(String::new()));
        let mut machine = Machine::new();
        machine.add_start_state(Step::A);
        machine.add_end_state(Step::E);
        machine.add_entry_actions(Step::E, &trace_action(&trace, "end"));
        machine.add_transition(always(Step::A, Step::E));
        machine.reset();

        machine.poll();

        assert!(machine.is_finished());
        assert!(!machine.is_active(&Step::E));
        assert_eq!(*trace.borrow(), "end");
    }

    #[test]
    fn transitions_are_kept_in_priority_then_insertion_order() {
        let mut machine = Machine::new();
        for (destination, priority) in [
            (Step::B, Priority::Low),
            (Step::C, Priority::High),
            (Step::D, Priority::Low),
            (Step::E, Priority::High),
        ] {
            machine.add_transition(Transition::new(
                Step::A,
                destination,
                Conditions::new(),
                priority,
                ActionChain::new(),
            ));
        }

        let order: Vec<Step> = machine
            .transitions_for(&Step::A)
            .into_iter()
            .map(|info| info.destination)
            .collect();

        assert_eq!(order, vec![Step::C, Step::E, Step::B, Step::D]);
        assert!(machine.transitions_for(&Step::B).is_empty());
    }

    #[test]
    fn entering_a_state_resets_its_outgoing_conditions() {
        let mut machine = Machine::new();
        machine.add_start_state(Step::A);
        machine.add_transition(Transition::new(
            Step::A,
            Step::B,
            Conditions::new().with(OnEvent::new("go")),
            Priority::Normal,
            ActionChain::new(),
        ));
        machine.add_transition(Transition::new(
            Step::B,
            Step::C,
            Conditions::new().with(OnEvent::new("go")),
            Priority::Normal,
            ActionChain::new(),
        ));
        machine.reset();

        // "go" reaches only A's transition; B's guard starts clean on entry.
        machine.handle_event(&"go");
        assert_eq!(machine.active_states(), HashSet::from([Step::B]));

        machine.handle_event(&"go");
        assert_eq!(machine.active_states(), HashSet::from([Step::C]));
    }

    struct EventCounter {
        seen: Rc<Cell<usize>>,
    }

    impl Condition<Step, &'static str> for EventCounter {
        fn handle_event(&mut self, _event: &&'static str) {
            self.seen.set(self.seen.get() + 1);
        }

        fn is_met(&self, _active: &ActiveStates<Step>) -> bool {
            false
        }

        fn describe(&self) -> String {
            String::from("counter")
        }
    }

    fn counted(source: Step, seen: &Rc<Cell<usize>>) -> Transition<Step, &'static str, Priority> {
        Transition::new(
            source,
            Step::E,
            Conditions::new().with(EventCounter {
                seen: Rc::clone(seen),
            }),
            Priority::Normal,
            ActionChain::new(),
        )
    }

    #[test]
    fn events_only_reach_transitions_of_active_states() {
        let from_active = Rc::new(Cell::new(0));
        let from_inactive = Rc::new(Cell::new(0));
        let mut machine = Machine::new();
        machine.add_start_state(Step::A);
        machine.add_start_state(Step::C);
        machine.add_transition(counted(Step::A, &from_active));
        machine.add_transition(counted(Step::B, &from_inactive));
        machine.add_transition(counted(Step::C, &from_active));
        machine.reset();

        machine.handle_event(&"one");
        machine.handle_event(&"two");

        assert_eq!(from_active.get(), 4);
        assert_eq!(from_inactive.get(), 0);
    }

    #[test]
    fn self_loop_fires_once_per_poll_and_reenters() {
        let trace = Rc::new(RefCell::new(String::new()));
        let mut machine = Machine::new();
        machine.add_start_state(Step::A);
        machine.add_entry_actions(Step::A, &trace_action(&trace, "e"));
        machine.add_transition(Transition::new(
            Step::A,
            Step::A,
            Conditions::new().with(Always),
            Priority::Normal,
            trace_action(&trace, "t"),
        ));
        machine.reset();
        trace.borrow_mut().clear();

        assert_eq!(machine.poll(), 1);
        assert_eq!(machine.poll(), 1);

        assert_eq!(*trace.borrow(), "tete");
        assert!(machine.is_active(&Step::A));
    }

    #[test]
    fn never_condition_blocks() {
        let mut machine = Machine::new();
        machine.add_start_state(Step::A);
        machine.add_transition(Transition::new(
            Step::A,
            Step::B,
            Conditions::new().with(Never),
            Priority::Normal,
            ActionChain::new(),
        ));
        machine.reset();

        assert_eq!(machine.poll(), 0);
        assert!(machine.is_active(&Step::A));
    }

    #[test]
    fn structure_lists_transitions_in_declaration_order() {
        let mut machine = Machine::new();
        machine.add_start_state(Step::A);
        machine.add_end_state(Step::E);
        machine.add_transition(always(Step::C, Step::D));
        machine.add_transition(always(Step::A, Step::B));
        machine.add_transition(always(Step::B, Step::C));

        let structure = machine.structure();

        assert_eq!(structure.start_states, vec![Step::A]);
        assert_eq!(structure.end_states, vec![Step::E]);
        let edges: Vec<(Step, Step)> = structure
            .transitions
            .iter()
            .map(|t| (t.source, t.destination))
            .collect();
        assert_eq!(
            edges,
            vec![(Step::C, Step::D), (Step::A, Step::B), (Step::B, Step::C)]
        );
        assert_eq!(structure.source_states(), vec![&Step::C, &Step::A, &Step::B]);
        assert_eq!(
            machine.source_states(),
            HashSet::from([Step::A, Step::B, Step::C])
        );
    }

    #[test]
    fn introspection_returns_copies() {
        let mut machine = Machine::new();
        machine.add_start_state(Step::A);

        let mut starts = machine.start_states();
        starts.insert(Step::B);
        let mut active = machine.active_states();
        active.clear();

        assert_eq!(machine.start_states(), HashSet::from([Step::A]));
        assert!(machine.is_active(&Step::A));
    }

    #[test]
    fn transition_info_serializes() {
        let mut machine = Machine::new();
        machine.add_transition(always(Step::A, Step::B));

        let structure = machine.structure();
        let json = serde_json::to_string(&structure).unwrap();
        let back: Structure<Step, Priority> = serde_json::from_str(&json).unwrap();

        assert_eq!(back, structure);
    }
}
