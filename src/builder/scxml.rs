//! Reads machines from [SCXML](https://www.w3.org/TR/scxml/) documents.
//!
//! SCXML describes hierarchical statecharts, this engine runs flat
//! non-deterministic machines, so only part of the format carries over:
//!
//! - `<scxml initial>` and `<state initial>` name start states
//! - `<state>`, `<parallel>` and nested `<scxml>` elements are flattened into
//!   plain states
//! - `<final>` elements become end states
//! - `<transition target cond event>` becomes one transition per target; the
//!   `cond` string is turned into conditions and the `event` string into
//!   transition actions
//! - the text of `<onentry>` and `<onexit>` is turned into entry and exit
//!   actions
//!
//! What the strings mean is left to a [`ScxmlInterpreter`]. Executable
//! content and the data model are not interpreted.
//!
//! Transitions get `u32` priorities from a [`PrioritySequence`] that starts
//! over for every document, so an earlier transition of a state outranks a
//! later one.

use super::error::ScxmlError;
use crate::core::{ActionChain, Conditions, PrioritySequence, State};
use crate::machine::{StateMachine, Transition};
use roxmltree::{Document, Node};
use tracing::{debug, warn};

/// Turns the strings of an SCXML document into engine values.
///
/// # Example
///
/// ```rust
/// use polystate::builder::{read_scxml, ScxmlInterpreter};
/// use polystate::conditions::OnEvent;
/// use polystate::core::{log, ActionChain, Conditions};
///
/// struct Plain;
///
/// impl ScxmlInterpreter<String, String> for Plain {
///     fn state(&mut self, name: &str) -> Option<String> {
///         Some(name.to_string())
///     }
///
///     fn conditions(&mut self, cond: &str) -> Conditions<String, String> {
///         Conditions::new().with(OnEvent::new(cond.to_string()))
///     }
///
///     fn actions(&mut self, event: &str) -> ActionChain {
///         ActionChain::new().with(log(event))
///     }
/// }
///
/// let document = r#"
///     <scxml initial="closed">
///         <state id="closed">
///             <transition cond="push" target="open"/>
///         </state>
///         <state id="open"/>
///     </scxml>"#;
///
/// let mut machine = read_scxml(document, &mut Plain).unwrap();
/// machine.handle_event(&"push".to_string());
/// assert!(machine.is_active(&"open".to_string()));
/// ```
pub trait ScxmlInterpreter<S: State, E> {
    /// The state called `name`, or `None` when the name is not acceptable.
    fn state(&mut self, name: &str) -> Option<S>;

    /// Conditions for a `cond` attribute. Called once per created transition.
    fn conditions(&mut self, cond: &str) -> Conditions<S, E>;

    /// Actions for an `event` attribute or the text of `<onentry>` and
    /// `<onexit>`.
    fn actions(&mut self, text: &str) -> ActionChain;
}

/// Read `document` into a new machine and reset it.
pub fn read_scxml<S, E, I>(
    document: &str,
    interpreter: &mut I,
) -> Result<StateMachine<S, E, u32>, ScxmlError>
where
    S: State,
    I: ScxmlInterpreter<S, E> + ?Sized,
{
    let mut machine = StateMachine::new();
    read_scxml_into(document, interpreter, &mut machine)?;
    machine.reset();
    Ok(machine)
}

/// Add everything `document` describes to an existing machine.
///
/// The machine is not reset. On error, whatever was read before the failing
/// element stays added.
pub fn read_scxml_into<S, E, I>(
    document: &str,
    interpreter: &mut I,
    machine: &mut StateMachine<S, E, u32>,
) -> Result<(), ScxmlError>
where
    S: State,
    I: ScxmlInterpreter<S, E> + ?Sized,
{
    let document = Document::parse(document)?;
    let root = document.root_element();
    let name = root.tag_name().name();
    if name != "scxml" {
        return Err(ScxmlError::NotScxml {
            found: name.to_string(),
        });
    }

    let mut reader = Reader {
        interpreter,
        machine,
        priorities: PrioritySequence::new(),
        transitions: 0,
    };
    reader.element(root)?;
    debug!(transitions = reader.transitions, "read SCXML document");
    Ok(())
}

struct Reader<'a, S: State, E, I: ?Sized> {
    interpreter: &'a mut I,
    machine: &'a mut StateMachine<S, E, u32>,
    priorities: PrioritySequence,
    transitions: usize,
}

impl<S, E, I> Reader<'_, S, E, I>
where
    S: State,
    I: ScxmlInterpreter<S, E> + ?Sized,
{
    fn element(&mut self, element: Node<'_, '_>) -> Result<(), ScxmlError> {
        if let Some(initial) = element.attribute("initial") {
            for name in initial.split_whitespace() {
                let state = self.state(name)?;
                self.machine.add_start_state(state);
            }
        }

        for child in element.children().filter(Node::is_element) {
            match child.tag_name().name() {
                "state" | "parallel" | "scxml" => self.element(child)?,
                "final" => {
                    let state = self.state_of(child)?;
                    self.machine.add_end_state(state);
                    self.element(child)?;
                }
                "transition" => self.transition(element, child)?,
                "onentry" => {
                    if let Some(actions) = self.text_actions(child) {
                        let state = self.state_of(element)?;
                        self.machine.add_entry_actions(state, &actions);
                    }
                }
                "onexit" => {
                    if let Some(actions) = self.text_actions(child) {
                        let state = self.state_of(element)?;
                        self.machine.add_exit_actions(state, &actions);
                    }
                }
                other => debug!(element = other, "skipping unsupported element"),
            }
        }
        Ok(())
    }

    fn transition(
        &mut self,
        parent: Node<'_, '_>,
        transition: Node<'_, '_>,
    ) -> Result<(), ScxmlError> {
        let targets: Vec<&str> = transition
            .attribute("target")
            .map(|targets| targets.split_whitespace().collect())
            .unwrap_or_default();
        if targets.is_empty() {
            warn!(
                state = parent.attribute("id").unwrap_or_default(),
                "ignoring transition without target"
            );
            return Ok(());
        }

        let source = self.state_of(parent)?;
        let priority = self.priorities.next_priority();
        for name in targets {
            let destination = self.state(name)?;
            let conditions = match transition.attribute("cond") {
                Some(cond) => self.interpreter.conditions(cond),
                None => Conditions::new(),
            };
            let actions = match transition.attribute("event") {
                Some(event) => self.interpreter.actions(event),
                None => ActionChain::new(),
            };
            self.machine.add_transition(Transition::new(
                source.clone(),
                destination,
                conditions,
                priority,
                actions,
            ));
            self.transitions += 1;
        }
        Ok(())
    }

    /// Actions for the text inside `element`, if it has any.
    fn text_actions(&mut self, element: Node<'_, '_>) -> Option<ActionChain> {
        let text: String = element
            .descendants()
            .filter(Node::is_text)
            .filter_map(|node| node.text())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| self.interpreter.actions(text))
    }

    fn state_of(&mut self, element: Node<'_, '_>) -> Result<S, ScxmlError> {
        let name = element
            .attribute("id")
            .ok_or_else(|| ScxmlError::MissingId {
                element: element.tag_name().name().to_string(),
            })?;
        self.state(name)
    }

    fn state(&mut self, name: &str) -> Result<S, ScxmlError> {
        self.interpreter
            .state(name)
            .ok_or_else(|| ScxmlError::UnknownState {
                name: name.to_string(),
            })
    }
}
