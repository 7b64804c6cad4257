//! Data-dependency validation: cycle detection over the input digraph.

use hexweave_common::{DiagCode, Diagnostic, Graph};
use std::collections::HashMap;

/// Three-color depth-first traversal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    InProgress,
    Done,
}

/// Detect cycles in the directed graph formed by input references.
///
/// Every node is traversed; reaching a node already in progress on the
/// current path is a data-dependency cycle (Error). Inputs that name no
/// node are skipped here — the structural pass already reported them.
pub fn check_dataflow(graph: &Graph) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    let index: HashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    let mut colors = vec![Color::Unvisited; graph.nodes.len()];

    for start in 0..graph.nodes.len() {
        if colors[start] != Color::Unvisited {
            continue;
        }
        visit(graph, &index, start, &mut colors, &mut diags);
    }

    diags
}

/// Iterative DFS; the second stack entry visit finalizes the node.
fn visit(
    graph: &Graph,
    index: &HashMap<&str, usize>,
    start: usize,
    colors: &mut [Color],
    diags: &mut Vec<Diagnostic>,
) {
    let mut stack = vec![(start, false)];

    while let Some((node_idx, finalize)) = stack.pop() {
        if finalize {
            colors[node_idx] = Color::Done;
            continue;
        }
        if colors[node_idx] == Color::Done {
            continue;
        }
        colors[node_idx] = Color::InProgress;
        stack.push((node_idx, true));

        let node = &graph.nodes[node_idx];
        for input in &node.inputs {
            let Some(&dep_idx) = index.get(input.as_str()) else {
                continue;
            };
            match colors[dep_idx] {
                Color::InProgress => {
                    diags.push(Diagnostic::error(
                        DiagCode::DataCycle,
                        &graph.id,
                        Some(&node.id),
                        format!("data dependency on '{input}' closes a cycle"),
                    ));
                }
                Color::Unvisited => stack.push((dep_idx, false)),
                Color::Done => {}
            }
        }
    }
}
