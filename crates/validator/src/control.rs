//! Control-flow validation: cycle detection over the `next` chain and
//! reachability warnings.

use hexweave_common::{DiagCode, Diagnostic, Graph};
use std::collections::HashSet;

/// Walk the `next` chain from the entry node.
///
/// A node id repeating before the chain ends is a control-flow cycle
/// (Error) and stops the walk. The ids visited before the repeat (or
/// before natural termination) form the reachable set; every node outside
/// it is flagged unreachable (Warning).
pub fn check_control(graph: &Graph) -> (HashSet<String>, Vec<Diagnostic>) {
    let mut diags = Vec::new();
    let mut reachable: HashSet<String> = HashSet::new();

    let mut cursor = graph.find(&graph.entry);
    while let Some(node) = cursor {
        if !reachable.insert(node.id.clone()) {
            diags.push(Diagnostic::error(
                DiagCode::ControlFlowCycle,
                &graph.id,
                Some(&node.id),
                format!("control flow revisits node '{}'", node.id),
            ));
            break;
        }
        cursor = node.next.as_deref().and_then(|next| graph.find(next));
    }

    for node in &graph.nodes {
        if !node.id.is_empty() && !reachable.contains(&node.id) {
            diags.push(Diagnostic::warning(
                DiagCode::UnreachableNode,
                &graph.id,
                Some(&node.id),
                format!("node '{}' is not reachable from the entry", node.id),
            ));
        }
    }

    (reachable, diags)
}
