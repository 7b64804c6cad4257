//! Hexweave compiler — validated ability graphs to register bytecode.
//!
//! The compiler assumes its input already passed the validator with zero
//! errors; everything it could rediscover from there is a defensive check.
//! Compilation is all-or-nothing: any Error-severity diagnostic anywhere
//! in the pass suppresses program emission.
//!
//! # Usage
//!
//! ```
//! use hexweave_common::{Graph, GraphKind, GraphNode};
//! use hexweave_compiler::compile;
//!
//! let graph = Graph::new("bolt", GraphKind::Effect, "dmg")
//!     .node(GraphNode::new("dmg", "ConstFloat").float(5.0));
//!
//! let (program, diags) = compile(&graph);
//! assert!(diags.is_empty());
//! assert_eq!(program.unwrap().instructions.len(), 1);
//! ```

pub mod emit;
pub mod intern;
pub mod listing;
pub mod registers;

pub use listing::listing;

use emit::fill_immediates;
use hexweave_common::{
    has_errors, CompiledProgram, DiagCode, Diagnostic, Graph, GraphNode, Instruction, Opcode,
    ValueKind,
};
use intern::SymbolInterner;
use registers::{RegisterAllocator, ValueMap};
use std::collections::HashSet;
use tracing::{debug, info, trace};

/// Compile a validator-accepted graph.
///
/// Returns the program and an empty diagnostic list on success, or `None`
/// and every problem found. Diagnostics accumulate across nodes except
/// for register-budget exhaustion, which aborts the pass immediately.
pub fn compile(graph: &Graph) -> (Option<CompiledProgram>, Vec<Diagnostic>) {
    let mut diags = Vec::new();
    let order = linearize(graph, &mut diags);

    let mut allocator = RegisterAllocator::new();
    let mut values = ValueMap::default();
    let mut interner = SymbolInterner::default();
    let mut instructions = Vec::with_capacity(order.len());

    for node in order {
        let Some(op) = Opcode::from_name(&node.op) else {
            diags.push(Diagnostic::error(
                DiagCode::UnknownOpcode,
                &graph.id,
                Some(&node.id),
                format!("unknown opcode '{}'", node.op),
            ));
            continue;
        };
        let spec = op.spec();
        let mut instr = Instruction::new(op);

        resolve_operands(graph, node, op, &values, &mut instr, &mut diags);

        if spec.output != ValueKind::Void {
            let register = match spec.fixed_entity_reg {
                Some(fixed) => fixed,
                None => match allocator.allocate(spec.output) {
                    Some(register) => register,
                    None => {
                        diags.push(Diagnostic::error(
                            DiagCode::RegisterBudget,
                            &graph.id,
                            Some(&node.id),
                            format!(
                                "{} register bank exhausted",
                                spec.output.bank_name()
                            ),
                        ));
                        break;
                    }
                },
            };
            instr.dst = register;
            values.record(&node.id, spec.output, register);
        }

        fill_immediates(op, node, &mut instr, &mut interner, &graph.id, &mut diags);
        trace!(node = %node.id, op = %node.op, "instruction emitted");
        instructions.push(instr);
    }

    if has_errors(&diags) {
        debug!(graph = %graph.id, diagnostics = diags.len(), "compilation failed");
        return (None, diags);
    }

    info!(
        graph = %graph.id,
        instructions = instructions.len(),
        symbols = interner.len(),
        "graph compiled"
    );
    let program = CompiledProgram::new(graph.id.clone(), interner.into_table(), instructions);
    (Some(program), diags)
}

/// Re-walk the `next` chain from entry into execution order.
///
/// The validator already rejects cycles and dangling references; finding
/// one here still has to stop the walk, so each is re-reported rather
/// than trusted away.
fn linearize<'g>(graph: &'g Graph, diags: &mut Vec<Diagnostic>) -> Vec<&'g GraphNode> {
    let mut order = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut cursor = graph.entry.as_str();

    loop {
        let Some(node) = graph.find(cursor) else {
            diags.push(Diagnostic::error(
                DiagCode::DanglingNext,
                &graph.id,
                None,
                format!("control flow references unknown node '{cursor}'"),
            ));
            break;
        };
        if !seen.insert(node.id.as_str()) {
            diags.push(Diagnostic::error(
                DiagCode::ControlFlowCycle,
                &graph.id,
                Some(&node.id),
                format!("control flow revisits node '{}'", node.id),
            ));
            break;
        }
        order.push(node);
        match node.next.as_deref() {
            Some(next) => cursor = next,
            None => break,
        }
    }

    order
}

/// Wire each declared operand slot to the register of an earlier node.
fn resolve_operands(
    graph: &Graph,
    node: &GraphNode,
    op: Opcode,
    values: &ValueMap,
    instr: &mut Instruction,
    diags: &mut Vec<Diagnostic>,
) {
    let spec = op.spec();
    let required = spec.operands.len() - spec.optional as usize;

    if node.inputs.len() > spec.operands.len() {
        let code = match op {
            Opcode::ApplyEffect | Opcode::ApplyEffectToTargets => DiagCode::TooManyEffectArgs,
            _ => DiagCode::TooManyInputs,
        };
        diags.push(Diagnostic::error(
            code,
            &graph.id,
            Some(&node.id),
            format!(
                "'{}' accepts at most {} inputs, {} wired",
                node.op,
                spec.operands.len(),
                node.inputs.len()
            ),
        ));
    }
    if node.inputs.len() < required {
        diags.push(Diagnostic::error(
            DiagCode::MissingInput,
            &graph.id,
            Some(&node.id),
            format!(
                "'{}' requires {} inputs, {} wired",
                node.op,
                required,
                node.inputs.len()
            ),
        ));
    }

    for (slot, input) in node.inputs.iter().take(spec.operands.len()).enumerate() {
        match values.resolve(input) {
            None => {
                diags.push(Diagnostic::error(
                    DiagCode::MissingInput,
                    &graph.id,
                    Some(&node.id),
                    format!("input '{input}' does not name an earlier value-producing node"),
                ));
            }
            Some((class, register)) => {
                let expected = spec.operands[slot];
                if class != expected {
                    diags.push(Diagnostic::error(
                        DiagCode::TypeMismatch,
                        &graph.id,
                        Some(&node.id),
                        format!(
                            "input '{input}' is {} but slot {slot} of '{}' expects {}",
                            class.bank_name(),
                            node.op,
                            expected.bank_name()
                        ),
                    ));
                } else {
                    instr.src[slot] = register;
                }
            }
        }
    }

    // The effect-application family records how many optional float
    // arguments were actually wired.
    if spec.optional > 0 {
        let wired_optional = node
            .inputs
            .len()
            .saturating_sub(required)
            .min(spec.optional as usize);
        instr.flags = wired_optional as u8;
    }
}
