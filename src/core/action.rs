//! Side effects run on state entry, state exit and transition firing.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A zero-argument side effect.
///
/// Every `FnMut()` closure is an action. Failures are not part of the
/// signature: a panicking action unwinds through the engine, and whatever
/// part of the current poll round already ran stays applied.
pub trait Action {
    fn execute(&mut self);
}

impl<F> Action for F
where
    F: FnMut(),
{
    fn execute(&mut self) {
        self()
    }
}

/// Shared handle to an action.
///
/// One declaration may attach the same action to transitions of several
/// source states, so chains hold actions behind reference-counted cells.
pub type SharedAction = Rc<RefCell<dyn Action>>;

/// Ordered list of actions, executed in registration order.
///
/// # Example
///
/// ```rust
/// use polystate::core::ActionChain;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let trace = Rc::new(RefCell::new(String::new()));
///
/// let mut chain = ActionChain::new();
/// let t = Rc::clone(&trace);
/// chain.push(move || t.borrow_mut().push('a'));
/// let t = Rc::clone(&trace);
/// chain.push(move || t.borrow_mut().push('b'));
///
/// chain.execute();
/// assert_eq!(*trace.borrow(), "ab");
/// ```
#[derive(Clone, Default)]
pub struct ActionChain {
    actions: Vec<SharedAction>,
}

impl ActionChain {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Append a single action.
    pub fn push<A>(&mut self, action: A)
    where
        A: Action + 'static,
    {
        self.actions.push(Rc::new(RefCell::new(action)));
    }

    /// Append an action that is already shared with other chains.
    pub fn push_shared(&mut self, action: SharedAction) {
        self.actions.push(action);
    }

    /// Append the actions of another chain, flattened.
    pub fn append(&mut self, other: &ActionChain) {
        self.actions.extend(other.actions.iter().cloned());
    }

    /// Builder-style `push`.
    pub fn with<A>(mut self, action: A) -> Self
    where
        A: Action + 'static,
    {
        self.push(action);
        self
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run every action in order.
    pub fn execute(&self) {
        for action in &self.actions {
            action.borrow_mut().execute();
        }
    }
}

impl<A> Extend<A> for ActionChain
where
    A: Action + 'static,
{
    fn extend<I: IntoIterator<Item = A>>(&mut self, iter: I) {
        for action in iter {
            self.push(action);
        }
    }
}

impl<A> FromIterator<A> for ActionChain
where
    A: Action + 'static,
{
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        let mut chain = ActionChain::new();
        chain.extend(iter);
        chain
    }
}

impl fmt::Debug for ActionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionChain")
            .field("len", &self.actions.len())
            .finish()
    }
}

/// Action that emits a `tracing` event at TRACE level.
#[derive(Clone, Debug)]
pub struct LogAction {
    text: String,
}

impl LogAction {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Action for LogAction {
    fn execute(&mut self) {
        tracing::trace!(target: "polystate::action", "{}", self.text);
    }
}

/// Shorthand for [`LogAction::new`].
pub fn log(text: impl Into<String>) -> LogAction {
    LogAction::new(text)
}
