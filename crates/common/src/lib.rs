//! Hexweave shared types: IR, opcode catalog, and instruction encoding.
//!
//! This crate provides the foundational data structures for the ability
//! graph pipeline:
//!
//! - [`Graph`] / [`GraphNode`] — the node-graph IR produced by the
//!   content pipeline and consumed by the validator and compiler
//! - [`Opcode`] — the closed operation catalog with per-op call shapes
//! - [`ValueKind`] / [`EntityHandle`] — the four register classes and
//!   the opaque host-entity handle
//! - [`Instruction`] — the fixed 16-byte instruction with encode/decode
//! - [`CompiledProgram`] / [`InlineProgram`] — the interchange and
//!   embedded program forms
//! - [`Diagnostic`] — structured validation/compilation findings
//!
//! # Dependencies
//!
//! This crate uses `thiserror` (compile-time proc-macro, zero runtime
//! cost) and has no other dependencies.

pub mod diagnostic;
pub mod error;
pub mod graph;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod value;

// Re-export commonly used types at the crate root.
pub use diagnostic::{has_errors, DiagCode, Diagnostic, Severity};
pub use error::DecodeError;
pub use graph::{Graph, GraphKind, GraphNode};
pub use instruction::Instruction;
pub use opcode::{Opcode, OpSpec, ALL_OPCODES, CASTER_REGISTER, TARGET_REGISTER};
pub use program::{CompiledProgram, InlineProgram, MAX_INLINE_INSTRUCTIONS};
pub use value::{EntityHandle, HexCoord, TeamRelation, ValueKind, Vec2, REGISTERS_PER_BANK};
