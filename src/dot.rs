//! Graphviz rendering of a machine [`Structure`].
//!
//! Every state is written as a double-quoted ID holding its escaped `Debug`
//! representation, so enums, chars and strings all give valid node names.
//! A `Red` variant becomes `"Red"`, the char `'a'` becomes `"'a'"`.

use crate::machine::Structure;
use std::fmt::{Debug, Write};

/// Render `structure` as a DOT digraph.
///
/// Start states are drawn as double circles, end states as dotted circles,
/// and every transition as an edge labelled with its condition.
///
/// # Example
///
/// ```
/// use polystate::builder::MachineBuilder;
/// use polystate::core::Priority;
/// use polystate::dot;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// let mut builder: MachineBuilder<Door, (), Priority> = MachineBuilder::new(Priority::Normal);
/// builder.state(Door::Open).start().always().then(Door::Closed);
///
/// let output = dot::render(&builder.build().structure());
/// assert!(output.contains("\t\"Open\" -> \"Closed\" [ label = \"always\" ];\n"));
/// ```
pub fn render<S: Debug + PartialEq, P>(structure: &Structure<S, P>) -> String {
    let mut output = String::from("digraph finite_state_machine {\n\trankdir=LR;\n\tsize=\"8,5\"\n");

    node_line(&mut output, "doublecircle, style=solid", &structure.start_states);
    node_line(&mut output, "circle, style=dotted", &structure.end_states);
    output.push_str("\tnode [shape = circle, style=solid];\n");

    for source in structure.source_states() {
        for transition in structure.transitions.iter().filter(|t| &t.source == source) {
            let _ = writeln!(
                output,
                "\t{} -> {} [ label = \"{}\" ];",
                node_id(&transition.source),
                node_id(&transition.destination),
                escape(&transition.conditions)
            );
        }
    }

    output.push_str("}\n");
    output
}

/// Empty groups are left out.
fn node_line<S: Debug>(output: &mut String, shape: &str, states: &[S]) {
    if states.is_empty() {
        return;
    }
    let _ = write!(output, "\tnode [shape = {shape}];");
    for state in states {
        let _ = write!(output, " {}", node_id(state));
    }
    output.push_str(";\n");
}

fn node_id<S: Debug>(state: &S) -> String {
    format!("\"{}\"", escape(&format!("{state:?}")))
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
