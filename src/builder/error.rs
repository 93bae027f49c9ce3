//! Build errors for transition and machine builders and the SCXML reader.

use std::fmt;
use thiserror::Error;

/// A mandatory part of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionField {
    Source,
    Destination,
    Priority,
}

impl fmt::Display for TransitionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Source => "source state (call .from(state))",
            Self::Destination => "destination state (call .to(state))",
            Self::Priority => "priority (call .priority(p))",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when building transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Every missing field is reported, not just the first one.
    #[error("Transition is incomplete, missing: {}", join(.missing))]
    IncompleteTransition { missing: Vec<TransitionField> },
}

/// Errors that can occur when reading an SCXML document.
#[derive(Debug, Error)]
pub enum ScxmlError {
    #[error("Malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Root element is <{found}>, expected <scxml>")]
    NotScxml { found: String },

    /// Only raised where a state is required, such as a transition source.
    #[error("<{element}> has no id attribute")]
    MissingId { element: String },

    #[error("State name '{name}' was rejected by the interpreter")]
    UnknownState { name: String },
}

fn join(fields: &[TransitionField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
