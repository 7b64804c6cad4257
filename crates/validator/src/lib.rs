//! Hexweave validator — static analysis for ability graphs.
//!
//! The validator checks a [`Graph`] for correctness BEFORE compilation is
//! attempted. It never fails: every problem it finds comes back as a
//! [`Diagnostic`], and it collects ALL of them rather than stopping at
//! the first. Compilation may proceed only when the returned list carries
//! no Error-severity entry.
//!
//! # Usage
//!
//! ```
//! use hexweave_common::{Graph, GraphKind, GraphNode, has_errors};
//! use hexweave_validator::validate;
//!
//! let graph = Graph::new("bolt", GraphKind::Effect, "dmg")
//!     .node(GraphNode::new("dmg", "ConstFloat").float(5.0));
//!
//! let diags = validate(&graph);
//! assert!(!has_errors(&diags));
//! ```
//!
//! # Passes
//!
//! 1. **Structural** — ids, duplicates, opcode resolution, dangling refs
//! 2. **Control** — `next`-chain cycle detection and reachability
//! 3. **Dataflow** — three-color DFS over the input digraph

pub mod control;
pub mod dataflow;
pub mod structural;

use hexweave_common::{Diagnostic, Graph};
use tracing::debug;

/// Validate a graph.
///
/// Always returns the full diagnostic list; never panics and never stops
/// at the first finding. The control pass needs an entry id to walk from,
/// so it is skipped when the entry id is empty (the structural pass has
/// already reported that as an Error).
pub fn validate(graph: &Graph) -> Vec<Diagnostic> {
    let mut diags = structural::check_structural(graph);

    if !graph.entry.is_empty() {
        let (_, control_diags) = control::check_control(graph);
        diags.extend(control_diags);
    }

    diags.extend(dataflow::check_dataflow(graph));

    debug!(
        graph = %graph.id,
        diagnostics = diags.len(),
        "graph validated"
    );
    diags
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexweave_common::{has_errors, DiagCode, GraphKind, GraphNode, Severity};

    #[test]
    fn minimal_valid_graph() {
        let graph = Graph::new("bolt", GraphKind::Effect, "c")
            .node(GraphNode::new("c", "ConstFloat").float(5.0));
        let diags = validate(&graph);
        assert!(diags.is_empty(), "unexpected: {diags:?}");
    }

    #[test]
    fn empty_entry_skips_control_pass() {
        let graph = Graph::new("g", GraphKind::Effect, "")
            .node(GraphNode::new("a", "Nop"));
        let diags = validate(&graph);
        assert!(diags.iter().any(|d| d.code == DiagCode::EmptyEntryId));
        // No unreachable warnings without a control walk.
        assert!(!diags.iter().any(|d| d.code == DiagCode::UnreachableNode));
    }

    #[test]
    fn multiple_findings_collected() {
        let graph = Graph::new("g", GraphKind::Effect, "a")
            .node(GraphNode::new("a", "Summon").next("ghost"))
            .node(GraphNode::new("b", "AddFloat").input("b"));
        let diags = validate(&graph);
        assert!(diags.iter().any(|d| d.code == DiagCode::UnknownOpcode));
        assert!(diags.iter().any(|d| d.code == DiagCode::DanglingNext));
        assert!(diags.iter().any(|d| d.code == DiagCode::DataCycle));
        assert!(diags.iter().any(|d| d.code == DiagCode::UnreachableNode));
    }

    #[test]
    fn control_cycle_rejected() {
        let graph = Graph::new("g", GraphKind::Effect, "a")
            .node(GraphNode::new("a", "Nop").next("b"))
            .node(GraphNode::new("b", "Nop").next("a"));
        let diags = validate(&graph);
        assert!(diags.iter().any(|d| d.code == DiagCode::ControlFlowCycle));
        assert!(has_errors(&diags));
    }

    #[test]
    fn warnings_alone_do_not_block() {
        let graph = Graph::new("g", GraphKind::Effect, "a")
            .node(GraphNode::new("a", "Nop"))
            .node(GraphNode::new("island", "Nop"));
        let diags = validate(&graph);
        assert!(!has_errors(&diags));
        assert!(diags.iter().all(|d| d.severity == Severity::Warning));
    }
}
