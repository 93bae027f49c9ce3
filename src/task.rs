//! Background work as an action, with its completion as a condition.
//!
//! Executing a [`TaskAction`] spawns a worker thread. The worker never
//! touches the machine: its completion is observed by a [`TaskFinished`]
//! condition during the owning thread's regular `poll` or `handle_event`.

use crate::core::{Action, ActiveStates, Condition, State};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

type Work = Arc<dyn Fn() + Send + Sync>;

enum Worker {
    Idle,
    Running(JoinHandle<()>),
    Joined,
}

impl Worker {
    fn is_finished(&self) -> bool {
        match self {
            Worker::Idle => false,
            Worker::Running(handle) => handle.is_finished(),
            Worker::Joined => true,
        }
    }
}

/// Action that runs `work` on a new thread each time it executes.
///
/// Clones share the most recently started worker, so one clone can be
/// attached to a transition while another produces the [`TaskFinished`]
/// condition for a later transition.
///
/// # Example
///
/// ```rust
/// use polystate::core::{Action, ActiveStates, Condition};
/// use polystate::task::TaskAction;
/// use std::time::Duration;
///
/// let mut task = TaskAction::new(|| std::thread::sleep(Duration::from_millis(10)));
/// let finished = task.finished();
/// let active: ActiveStates<char> = ActiveStates::new();
///
/// assert!(!Condition::<char, ()>::is_met(&finished, &active));
/// task.execute();
/// task.join();
/// assert!(Condition::<char, ()>::is_met(&finished, &active));
/// ```
#[derive(Clone)]
pub struct TaskAction {
    work: Work,
    worker: Rc<RefCell<Worker>>,
}

impl TaskAction {
    pub fn new<F>(work: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            work: Arc::new(work),
            worker: Rc::new(RefCell::new(Worker::Idle)),
        }
    }

    /// Condition met once the most recently started worker has terminated.
    /// Unmet while no worker has been started.
    pub fn finished(&self) -> TaskFinished {
        TaskFinished {
            worker: Rc::clone(&self.worker),
        }
    }

    /// Whether the most recently started worker has terminated.
    pub fn is_finished(&self) -> bool {
        self.worker.borrow().is_finished()
    }

    /// Block until the most recently started worker terminates.
    pub fn join(&self) {
        let mut worker = self.worker.borrow_mut();
        *worker = match std::mem::replace(&mut *worker, Worker::Idle) {
            Worker::Running(handle) => {
                if handle.join().is_err() {
                    warn!("task panicked");
                }
                Worker::Joined
            }
            other => other,
        };
    }
}

impl Action for TaskAction {
    fn execute(&mut self) {
        debug!("start task");
        let work = Arc::clone(&self.work);
        let handle = thread::spawn(move || work());
        *self.worker.borrow_mut() = Worker::Running(handle);
    }
}

/// Condition met once the worker of a [`TaskAction`] has terminated.
pub struct TaskFinished {
    worker: Rc<RefCell<Worker>>,
}

impl<S: State, E> Condition<S, E> for TaskFinished {
    fn is_met(&self, _active: &ActiveStates<S>) -> bool {
        self.worker.borrow().is_finished()
    }

    fn describe(&self) -> String {
        String::from("task finished")
    }
}
