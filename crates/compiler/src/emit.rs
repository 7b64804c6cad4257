//! Per-opcode immediate encoding.
//!
//! Operand registers and destinations are wired by the main compile pass;
//! this module moves each node's literal and symbolic fields into the
//! instruction's immediates, reporting what is missing.

use crate::intern::SymbolInterner;
use hexweave_common::{DiagCode, Diagnostic, GraphNode, Instruction, Opcode};

/// Fill `instr`'s immediates from `node` according to the opcode's needs.
///
/// Problems are accumulated into `diags`; the instruction is still
/// returned filled as far as possible, because an error anywhere already
/// suppresses program emission.
pub fn fill_immediates(
    op: Opcode,
    node: &GraphNode,
    instr: &mut Instruction,
    interner: &mut SymbolInterner,
    graph_id: &str,
    diags: &mut Vec<Diagnostic>,
) {
    match op {
        Opcode::ConstFloat => {
            if let Some(value) = require_float(node, graph_id, diags) {
                instr.imm_f = value;
            }
        }
        Opcode::ConstInt => {
            if let Some(value) = require_int(node, graph_id, diags) {
                instr.imm_i = value;
            }
        }
        Opcode::ConstBool => {
            if let Some(value) = require_bool(node, graph_id, diags) {
                instr.imm_i = value as i32;
            }
        }

        Opcode::Jump | Opcode::JumpIfFalse => {
            if let Some(offset) = require_int(node, graph_id, diags) {
                instr.imm_i = offset;
            }
        }

        Opcode::HasTag
        | Opcode::ReadAttribute
        | Opcode::FilterTag
        | Opcode::ApplyEffect
        | Opcode::ApplyEffectToTargets
        | Opcode::ModifyAttribute
        | Opcode::SendEvent
        | Opcode::ScratchReadFloat
        | Opcode::ScratchWriteFloat
        | Opcode::ScratchReadInt
        | Opcode::ScratchWriteInt
        | Opcode::ScratchReadEntity
        | Opcode::ScratchWriteEntity
        | Opcode::ParamFloat
        | Opcode::ParamInt
        | Opcode::ReadSelfAttribute
        | Opcode::WriteSelfAttribute => {
            if let Some(symbol) = require_symbol(node, graph_id, diags) {
                instr.imm_i = interner.intern(symbol) as i32;
            }
        }

        Opcode::QueryCircle => {
            if let Some(radius) = require_float(node, graph_id, diags) {
                instr.imm_f = radius;
            }
        }
        Opcode::QueryCone => {
            if let Some(radius) = require_float(node, graph_id, diags) {
                instr.imm_f = radius;
            }
            if let Some(half_angle) = require_int(node, graph_id, diags) {
                instr.imm_i = half_angle;
            }
        }
        Opcode::QueryRect | Opcode::QueryLine => {
            if let Some(length) = require_float(node, graph_id, diags) {
                instr.imm_f = length;
            }
            // The second dimension rides in the integer immediate as raw
            // f32 bits; the handler reverses the cast.
            if let Some(extent) = require_extent(node, graph_id, diags) {
                instr.imm_i = extent.to_bits() as i32;
            }
        }
        Opcode::QueryHexRange | Opcode::QueryHexRing => {
            if let Some(radius) = require_int(node, graph_id, diags) {
                instr.imm_i = radius;
            }
        }

        Opcode::FilterLayer | Opcode::FilterTeam | Opcode::LimitTargets | Opcode::TargetAt => {
            if let Some(value) = require_int(node, graph_id, diags) {
                instr.imm_i = value;
            }
        }

        // No immediates.
        Opcode::Nop
        | Opcode::LoadCaster
        | Opcode::LoadTarget
        | Opcode::LoadEffectSource
        | Opcode::LoadEffectTarget
        | Opcode::LoadEffectContext
        | Opcode::AddFloat
        | Opcode::SubFloat
        | Opcode::MulFloat
        | Opcode::DivFloat
        | Opcode::MinFloat
        | Opcode::MaxFloat
        | Opcode::ClampFloat
        | Opcode::AbsFloat
        | Opcode::NegFloat
        | Opcode::CompareGtFloat
        | Opcode::CompareLtFloat
        | Opcode::CompareGeFloat
        | Opcode::CompareLeFloat
        | Opcode::AddInt
        | Opcode::SubInt
        | Opcode::MulInt
        | Opcode::CompareEqInt
        | Opcode::CompareGtInt
        | Opcode::CompareLtInt
        | Opcode::AndBool
        | Opcode::OrBool
        | Opcode::NotBool
        | Opcode::EntityValid
        | Opcode::SelectEntity
        | Opcode::QueryHexNeighbors
        | Opcode::FilterExclude
        | Opcode::SortDedupTargets
        | Opcode::CountTargets
        | Opcode::NearestTarget
        | Opcode::ApplyEffectDynamic => {}
    }
}

fn require_float(node: &GraphNode, graph_id: &str, diags: &mut Vec<Diagnostic>) -> Option<f32> {
    if node.float_value.is_none() {
        diags.push(Diagnostic::error(
            DiagCode::MissingLiteral,
            graph_id,
            Some(&node.id),
            format!("'{}' needs a float literal", node.op),
        ));
    }
    node.float_value
}

fn require_int(node: &GraphNode, graph_id: &str, diags: &mut Vec<Diagnostic>) -> Option<i32> {
    if node.int_value.is_none() {
        diags.push(Diagnostic::error(
            DiagCode::MissingLiteral,
            graph_id,
            Some(&node.id),
            format!("'{}' needs an int literal", node.op),
        ));
    }
    node.int_value
}

fn require_bool(node: &GraphNode, graph_id: &str, diags: &mut Vec<Diagnostic>) -> Option<bool> {
    if node.bool_value.is_none() {
        diags.push(Diagnostic::error(
            DiagCode::MissingLiteral,
            graph_id,
            Some(&node.id),
            format!("'{}' needs a bool literal", node.op),
        ));
    }
    node.bool_value
}

fn require_extent(node: &GraphNode, graph_id: &str, diags: &mut Vec<Diagnostic>) -> Option<f32> {
    if node.extent.is_none() {
        diags.push(Diagnostic::error(
            DiagCode::MissingLiteral,
            graph_id,
            Some(&node.id),
            format!("'{}' needs an extent", node.op),
        ));
    }
    node.extent
}

fn require_symbol<'n>(
    node: &'n GraphNode,
    graph_id: &str,
    diags: &mut Vec<Diagnostic>,
) -> Option<&'n str> {
    if node.name.is_none() {
        diags.push(Diagnostic::error(
            DiagCode::MissingSymbol,
            graph_id,
            Some(&node.id),
            format!("'{}' needs a symbolic name", node.op),
        ));
    }
    node.name.as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(node: &GraphNode) -> (Instruction, Vec<Diagnostic>, SymbolInterner) {
        let op = Opcode::from_name(&node.op).unwrap();
        let mut instr = Instruction::new(op);
        let mut interner = SymbolInterner::default();
        let mut diags = Vec::new();
        fill_immediates(op, node, &mut instr, &mut interner, "g", &mut diags);
        (instr, diags, interner)
    }

    #[test]
    fn const_float_literal() {
        let (instr, diags, _) = emit(&GraphNode::new("a", "ConstFloat").float(2.5));
        assert!(diags.is_empty());
        assert_eq!(instr.imm_f, 2.5);
    }

    #[test]
    fn const_bool_encodes_as_int() {
        let (instr, diags, _) = emit(&GraphNode::new("a", "ConstBool").boolean(true));
        assert!(diags.is_empty());
        assert_eq!(instr.imm_i, 1);
    }

    #[test]
    fn missing_literal_reported() {
        let (_, diags, _) = emit(&GraphNode::new("a", "ConstFloat"));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagCode::MissingLiteral);
    }

    #[test]
    fn symbol_interned_into_integer_immediate() {
        let (instr, diags, interner) = emit(&GraphNode::new("a", "FilterTag").name("undead"));
        assert!(diags.is_empty());
        assert_eq!(instr.imm_i, 0);
        assert_eq!(interner.into_table(), vec!["undead".to_string()]);
    }

    #[test]
    fn missing_symbol_reported() {
        let (_, diags, _) = emit(&GraphNode::new("a", "ApplyEffect"));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagCode::MissingSymbol);
    }

    #[test]
    fn rect_extent_travels_as_bits() {
        let (instr, diags, _) = emit(&GraphNode::new("a", "QueryRect").float(8.0).extent(1.5));
        assert!(diags.is_empty());
        assert_eq!(instr.imm_f, 8.0);
        assert_eq!(f32::from_bits(instr.imm_i as u32), 1.5);
    }

    #[test]
    fn cone_needs_both_dimensions() {
        let (_, diags, _) = emit(&GraphNode::new("a", "QueryCone"));
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn dynamic_effect_needs_no_symbol() {
        let (_, diags, _) = emit(&GraphNode::new("a", "ApplyEffectDynamic"));
        assert!(diags.is_empty());
    }
}
