//! Integration tests for the Hexweave validator.

use hexweave_common::{has_errors, DiagCode, Graph, GraphKind, GraphNode, Severity};
use hexweave_validator::validate;

/// A linear chain of no-ops with the given ids.
fn chain(ids: &[&str]) -> Graph {
    let mut graph = Graph::new("test_graph", GraphKind::Effect, ids[0]);
    for (i, id) in ids.iter().enumerate() {
        let mut node = GraphNode::new(*id, "Nop");
        if let Some(next) = ids.get(i + 1) {
            node = node.next(*next);
        }
        graph.nodes.push(node);
    }
    graph
}

fn codes(graph: &Graph) -> Vec<DiagCode> {
    validate(graph).into_iter().map(|d| d.code).collect()
}

// ============================================================
// Acceptance
// ============================================================

#[test]
fn well_formed_graph_passes() {
    let graph = Graph::new("heal_pulse", GraphKind::Effect, "amount")
        .node(
            GraphNode::new("amount", "ConstFloat")
                .float(12.5)
                .next("who"),
        )
        .node(GraphNode::new("who", "LoadTarget").next("apply"))
        .node(
            GraphNode::new("apply", "ApplyEffect")
                .input("who")
                .input("amount")
                .name("heal"),
        );
    assert!(validate(&graph).is_empty());
}

#[test]
fn empty_graph_with_entry_reports_unknown_entry() {
    let graph = Graph::new("g", GraphKind::Validation, "start");
    let diags = validate(&graph);
    assert!(diags.iter().any(|d| d.code == DiagCode::UnknownEntry));
    assert!(has_errors(&diags));
}

// ============================================================
// Control flow
// ============================================================

#[test]
fn next_chain_cycle_is_an_error() {
    let mut graph = chain(&["a", "b", "c"]);
    graph.nodes[2].next = Some("b".to_string());
    let diags = validate(&graph);
    let cycle = diags
        .iter()
        .find(|d| d.code == DiagCode::ControlFlowCycle)
        .expect("cycle diagnostic");
    assert_eq!(cycle.severity, Severity::Error);
    assert_eq!(cycle.node.as_deref(), Some("b"));
}

#[test]
fn unreachable_is_warning_only() {
    let mut graph = chain(&["a"]);
    graph.nodes.push(GraphNode::new("stranded", "Nop"));
    let diags = validate(&graph);
    assert!(!has_errors(&diags));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, DiagCode::UnreachableNode);
}

// ============================================================
// Data dependencies
// ============================================================

#[test]
fn mutual_input_cycle_is_an_error() {
    let graph = Graph::new("g", GraphKind::Effect, "a")
        .node(GraphNode::new("a", "AddFloat").input("b").next("b"))
        .node(GraphNode::new("b", "AddFloat").input("a"));
    let diags = validate(&graph);
    assert!(diags.iter().any(|d| d.code == DiagCode::DataCycle));
    assert!(has_errors(&diags));
}

#[test]
fn long_dependency_chain_is_fine() {
    let mut graph = Graph::new("g", GraphKind::Effect, "n0");
    graph.nodes.push(GraphNode::new("n0", "ConstFloat").float(1.0).next("n1"));
    for i in 1..20 {
        let mut node = GraphNode::new(format!("n{i}"), "AbsFloat").input(format!("n{}", i - 1));
        if i < 19 {
            node = node.next(format!("n{}", i + 1));
        }
        graph.nodes.push(node);
    }
    assert!(validate(&graph).is_empty());
}

// ============================================================
// Independence of checks
// ============================================================

#[test]
fn everything_wrong_at_once() {
    let mut graph = Graph::new("g", GraphKind::Effect, "a");
    graph.nodes.push(GraphNode::new("a", "Conjure").next("a"));
    graph.nodes.push(GraphNode::new("b", "AddFloat").input("c"));
    graph.nodes.push(GraphNode::new("c", "AddFloat").input("b"));
    graph.nodes.push(GraphNode::new("b", "Nop"));

    let found = codes(&graph);
    for expected in [
        DiagCode::UnknownOpcode,
        DiagCode::ControlFlowCycle,
        DiagCode::DuplicateNodeId,
        DiagCode::DataCycle,
        DiagCode::UnreachableNode,
    ] {
        assert!(found.contains(&expected), "missing {expected:?}: {found:?}");
    }
}

#[test]
fn validation_is_deterministic() {
    let mut graph = chain(&["a", "b", "c"]);
    graph.nodes[2].next = Some("a".to_string());
    graph.nodes.push(GraphNode::new("x", "AddFloat").input("x"));
    assert_eq!(validate(&graph), validate(&graph));
}

// ============================================================
// Properties
// ============================================================

mod properties {
    use super::*;
    use proptest::prelude::*;

    /// Arbitrary small graphs: ids drawn from a tiny pool so duplicates,
    /// cycles, and dangling references all occur naturally.
    fn arb_graph() -> impl Strategy<Value = Graph> {
        let id = prop::sample::select(vec!["a", "b", "c", "d", ""]);
        let op = prop::sample::select(vec!["Nop", "ConstFloat", "AddFloat", "Bogus"]);
        let node = (
            id.clone(),
            op,
            prop::option::of(id.clone()),
            prop::collection::vec(id.clone(), 0..3),
        )
            .prop_map(|(id, op, next, inputs)| {
                let mut n = GraphNode::new(id, op);
                n.next = next.map(str::to_owned);
                n.inputs = inputs.into_iter().map(str::to_owned).collect();
                n
            });
        (id, prop::collection::vec(node, 0..6)).prop_map(|(entry, nodes)| {
            let mut g = Graph::new("prop_graph", GraphKind::Effect, entry);
            g.nodes = nodes;
            g
        })
    }

    proptest! {
        /// The validator never panics and always terminates, whatever the
        /// wiring looks like.
        #[test]
        fn never_panics(graph in arb_graph()) {
            let first = validate(&graph);
            let second = validate(&graph);
            prop_assert_eq!(first, second);
        }
    }
}
