//! Structural validation: identities, opcode resolution, and reference
//! integrity.

use hexweave_common::{DiagCode, Diagnostic, Graph, Opcode};
use std::collections::HashSet;

/// Run the structural checks.
///
/// Covers graph/entry/node id presence, duplicate node ids, opcode-name
/// resolution, entry resolution, and dangling `next`/input references.
/// Each check runs regardless of what the others found; the entry-id
/// resolution check is skipped when the entry id is empty.
pub fn check_structural(graph: &Graph) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    if graph.id.is_empty() {
        diags.push(Diagnostic::error(
            DiagCode::EmptyGraphId,
            &graph.id,
            None,
            "graph id is empty",
        ));
    }
    if graph.entry.is_empty() {
        diags.push(Diagnostic::error(
            DiagCode::EmptyEntryId,
            &graph.id,
            None,
            "entry node id is empty",
        ));
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for node in &graph.nodes {
        if node.id.is_empty() {
            diags.push(Diagnostic::error(
                DiagCode::EmptyNodeId,
                &graph.id,
                None,
                "node has an empty id",
            ));
        } else if !seen.insert(node.id.as_str()) {
            diags.push(Diagnostic::error(
                DiagCode::DuplicateNodeId,
                &graph.id,
                Some(&node.id),
                format!("node id '{}' is defined more than once", node.id),
            ));
        }

        if Opcode::from_name(&node.op).is_none() {
            diags.push(Diagnostic::error(
                DiagCode::UnknownOpcode,
                &graph.id,
                Some(&node.id),
                format!("unknown opcode '{}'", node.op),
            ));
        }
    }

    if !graph.entry.is_empty() && graph.find(&graph.entry).is_none() {
        diags.push(Diagnostic::error(
            DiagCode::UnknownEntry,
            &graph.id,
            None,
            format!("entry id '{}' names no node", graph.entry),
        ));
    }

    for node in &graph.nodes {
        if let Some(next) = &node.next {
            if graph.find(next).is_none() {
                diags.push(Diagnostic::error(
                    DiagCode::DanglingNext,
                    &graph.id,
                    Some(&node.id),
                    format!("next references unknown node '{next}'"),
                ));
            }
        }
        for input in &node.inputs {
            if graph.find(input).is_none() {
                diags.push(Diagnostic::error(
                    DiagCode::DanglingInput,
                    &graph.id,
                    Some(&node.id),
                    format!("input references unknown node '{input}'"),
                ));
            }
        }
    }

    diags
}
