//! The closed opcode catalog for compiled ability graphs.
//!
//! Each variant's discriminant is its dispatch-table index. IR nodes carry
//! opcode names as strings; [`Opcode::from_name`] resolves them once at
//! compile time and nothing downstream ever sees the string again.

use crate::error::DecodeError;
use crate::value::ValueKind;

/// Entity register pre-populated with the casting entity.
pub const CASTER_REGISTER: u8 = 0;
/// Entity register pre-populated with the explicit target entity.
pub const TARGET_REGISTER: u8 = 1;

/// Identifies one VM operation.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Control flow
    /// Does nothing. The interpreter skips it without dispatch.
    Nop = 0x00,
    /// Move the program counter by the signed offset in `imm_i`.
    /// Offset 0 re-executes the jump itself.
    Jump = 0x01,
    /// Move by the signed offset in `imm_i` when the bool in src0 is false;
    /// fall through otherwise.
    JumpIfFalse = 0x02,

    // Constants
    /// Write `imm_f` to the destination float register.
    ConstFloat = 0x03,
    /// Write `imm_i` to the destination int register.
    ConstInt = 0x04,
    /// Write `imm_i != 0` to the destination bool register.
    ConstBool = 0x05,

    // Entity loads
    /// Load the casting entity into fixed entity register 0.
    LoadCaster = 0x06,
    /// Load the explicit target entity into fixed entity register 1.
    LoadTarget = 0x07,
    /// Load the casting entity under the derived-graph naming scheme.
    LoadEffectSource = 0x08,
    /// Load the explicit target under the derived-graph naming scheme.
    LoadEffectTarget = 0x09,
    /// Load the target-context entity of the current execution.
    LoadEffectContext = 0x0A,

    // Float arithmetic
    AddFloat = 0x10,
    SubFloat = 0x11,
    MulFloat = 0x12,
    /// Quotient, or 0.0 when the divisor is zero.
    DivFloat = 0x13,
    MinFloat = 0x14,
    MaxFloat = 0x15,
    /// Clamp src0 into [src1, src2].
    ClampFloat = 0x16,
    AbsFloat = 0x17,
    NegFloat = 0x18,

    // Float comparison
    CompareGtFloat = 0x20,
    CompareLtFloat = 0x21,
    CompareGeFloat = 0x22,
    CompareLeFloat = 0x23,

    // Int arithmetic and comparison
    AddInt = 0x24,
    SubInt = 0x25,
    MulInt = 0x26,
    CompareEqInt = 0x27,
    CompareGtInt = 0x28,
    CompareLtInt = 0x29,

    // Boolean logic and entity predicates
    AndBool = 0x2A,
    OrBool = 0x2B,
    NotBool = 0x2C,
    /// True when the entity in src0 carries the tag named by symbol `imm_i`.
    HasTag = 0x2D,
    /// True when the handle in src0 is non-null and alive per the host.
    EntityValid = 0x2E,
    /// dst = src0 ? src1 : src2 over entity registers.
    SelectEntity = 0x2F,

    /// Current value of the attribute named by symbol `imm_i` on the entity
    /// in src0. Reads 0.0 through a dead or unreadable handle.
    ReadAttribute = 0x30,

    // Spatial queries. Each fills the target list through the query
    // scratch buffer, bounded by its capacity.
    /// Entities within `imm_f` world units of the src0 entity's position.
    QueryCircle = 0x40,
    /// Entities inside the cone from src0's position toward the target
    /// position: radius `imm_f`, half-angle `imm_i` degrees.
    QueryCone = 0x41,
    /// Entities inside the rectangle extending `imm_f` units from src0's
    /// position toward the target position; half-width is `imm_i`
    /// reinterpreted as f32 bits.
    QueryRect = 0x42,
    /// Entities within a capsule from src0's position toward the target
    /// position: length `imm_f`, radius `imm_i` as f32 bits.
    QueryLine = 0x43,
    /// Entities within `imm_i` hexes of the src0 entity's hex.
    QueryHexRange = 0x44,
    /// Entities exactly `imm_i` hexes from the src0 entity's hex.
    QueryHexRing = 0x45,
    /// Entities on the six hexes adjacent to the src0 entity's hex.
    QueryHexNeighbors = 0x46,

    // Target-list filters and reducers
    /// Keep targets carrying the tag named by symbol `imm_i`.
    FilterTag = 0x50,
    /// Keep targets whose layer-category bitmask intersects `imm_i`.
    FilterLayer = 0x51,
    /// Keep targets whose relation to the src0 entity matches the
    /// relation code in `imm_i`.
    FilterTeam = 0x52,
    /// Remove the src0 entity from the target list.
    FilterExclude = 0x53,
    /// Stable-sort targets by raw handle and drop duplicates.
    SortDedupTargets = 0x54,
    /// Truncate the target list to at most `imm_i` entries.
    LimitTargets = 0x55,
    /// Number of live targets, into the destination int register.
    CountTargets = 0x56,
    /// Target at index `imm_i`, or the null handle past the end.
    TargetAt = 0x57,
    /// Target nearest to the src0 entity, or the null handle when empty.
    NearestTarget = 0x58,

    // Effect actions
    /// Apply the effect template named by symbol `imm_i` to the src0
    /// entity. Flags bits 0-1 carry the wired float-argument count (0-2);
    /// the arguments ride in src1/src2.
    ApplyEffect = 0x60,
    /// Apply the template named by symbol `imm_i` to every target in the
    /// list, with the same optional-argument encoding as `ApplyEffect`.
    ApplyEffectToTargets = 0x61,
    /// Apply the template whose symbol index is read from the int register
    /// in src1 to the src0 entity.
    ApplyEffectDynamic = 0x62,
    /// Add the float in src1 to the attribute named by symbol `imm_i` on
    /// the src0 entity.
    ModifyAttribute = 0x63,
    /// Fire the event tagged by symbol `imm_i` at the src0 entity with the
    /// magnitude in src1.
    SendEvent = 0x64,

    // Per-entity scratch ("blackboard")
    /// Read the float scratch key named by symbol `imm_i` on src0; 0.0
    /// when absent.
    ScratchReadFloat = 0x70,
    ScratchWriteFloat = 0x71,
    /// Read the int scratch key; 0 when absent.
    ScratchReadInt = 0x72,
    ScratchWriteInt = 0x73,
    /// Read the entity scratch key; the null handle when absent.
    ScratchReadEntity = 0x74,
    ScratchWriteEntity = 0x75,

    // Template-scoped config parameters
    /// Read the float config parameter named by symbol `imm_i` in the
    /// current graph's scope; 0.0 when absent.
    ParamFloat = 0x80,
    /// Read the int config parameter; 0 when absent.
    ParamInt = 0x81,

    // Direct base-attribute access, bypassing the effect-modifier pipeline
    ReadSelfAttribute = 0x82,
    WriteSelfAttribute = 0x83,
}

/// All defined opcodes, in discriminant order. Useful for exhaustive tests.
pub const ALL_OPCODES: [Opcode; 68] = [
    Opcode::Nop,
    Opcode::Jump,
    Opcode::JumpIfFalse,
    Opcode::ConstFloat,
    Opcode::ConstInt,
    Opcode::ConstBool,
    Opcode::LoadCaster,
    Opcode::LoadTarget,
    Opcode::LoadEffectSource,
    Opcode::LoadEffectTarget,
    Opcode::LoadEffectContext,
    Opcode::AddFloat,
    Opcode::SubFloat,
    Opcode::MulFloat,
    Opcode::DivFloat,
    Opcode::MinFloat,
    Opcode::MaxFloat,
    Opcode::ClampFloat,
    Opcode::AbsFloat,
    Opcode::NegFloat,
    Opcode::CompareGtFloat,
    Opcode::CompareLtFloat,
    Opcode::CompareGeFloat,
    Opcode::CompareLeFloat,
    Opcode::AddInt,
    Opcode::SubInt,
    Opcode::MulInt,
    Opcode::CompareEqInt,
    Opcode::CompareGtInt,
    Opcode::CompareLtInt,
    Opcode::AndBool,
    Opcode::OrBool,
    Opcode::NotBool,
    Opcode::HasTag,
    Opcode::EntityValid,
    Opcode::SelectEntity,
    Opcode::ReadAttribute,
    Opcode::QueryCircle,
    Opcode::QueryCone,
    Opcode::QueryRect,
    Opcode::QueryLine,
    Opcode::QueryHexRange,
    Opcode::QueryHexRing,
    Opcode::QueryHexNeighbors,
    Opcode::FilterTag,
    Opcode::FilterLayer,
    Opcode::FilterTeam,
    Opcode::FilterExclude,
    Opcode::SortDedupTargets,
    Opcode::LimitTargets,
    Opcode::CountTargets,
    Opcode::TargetAt,
    Opcode::NearestTarget,
    Opcode::ApplyEffect,
    Opcode::ApplyEffectToTargets,
    Opcode::ApplyEffectDynamic,
    Opcode::ModifyAttribute,
    Opcode::SendEvent,
    Opcode::ScratchReadFloat,
    Opcode::ScratchWriteFloat,
    Opcode::ScratchReadInt,
    Opcode::ScratchWriteInt,
    Opcode::ScratchReadEntity,
    Opcode::ScratchWriteEntity,
    Opcode::ParamFloat,
    Opcode::ParamInt,
    Opcode::ReadSelfAttribute,
    Opcode::WriteSelfAttribute,
];

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Opcode::Nop),
            0x01 => Ok(Opcode::Jump),
            0x02 => Ok(Opcode::JumpIfFalse),
            0x03 => Ok(Opcode::ConstFloat),
            0x04 => Ok(Opcode::ConstInt),
            0x05 => Ok(Opcode::ConstBool),
            0x06 => Ok(Opcode::LoadCaster),
            0x07 => Ok(Opcode::LoadTarget),
            0x08 => Ok(Opcode::LoadEffectSource),
            0x09 => Ok(Opcode::LoadEffectTarget),
            0x0A => Ok(Opcode::LoadEffectContext),
            0x10 => Ok(Opcode::AddFloat),
            0x11 => Ok(Opcode::SubFloat),
            0x12 => Ok(Opcode::MulFloat),
            0x13 => Ok(Opcode::DivFloat),
            0x14 => Ok(Opcode::MinFloat),
            0x15 => Ok(Opcode::MaxFloat),
            0x16 => Ok(Opcode::ClampFloat),
            0x17 => Ok(Opcode::AbsFloat),
            0x18 => Ok(Opcode::NegFloat),
            0x20 => Ok(Opcode::CompareGtFloat),
            0x21 => Ok(Opcode::CompareLtFloat),
            0x22 => Ok(Opcode::CompareGeFloat),
            0x23 => Ok(Opcode::CompareLeFloat),
            0x24 => Ok(Opcode::AddInt),
            0x25 => Ok(Opcode::SubInt),
            0x26 => Ok(Opcode::MulInt),
            0x27 => Ok(Opcode::CompareEqInt),
            0x28 => Ok(Opcode::CompareGtInt),
            0x29 => Ok(Opcode::CompareLtInt),
            0x2A => Ok(Opcode::AndBool),
            0x2B => Ok(Opcode::OrBool),
            0x2C => Ok(Opcode::NotBool),
            0x2D => Ok(Opcode::HasTag),
            0x2E => Ok(Opcode::EntityValid),
            0x2F => Ok(Opcode::SelectEntity),
            0x30 => Ok(Opcode::ReadAttribute),
            0x40 => Ok(Opcode::QueryCircle),
            0x41 => Ok(Opcode::QueryCone),
            0x42 => Ok(Opcode::QueryRect),
            0x43 => Ok(Opcode::QueryLine),
            0x44 => Ok(Opcode::QueryHexRange),
            0x45 => Ok(Opcode::QueryHexRing),
            0x46 => Ok(Opcode::QueryHexNeighbors),
            0x50 => Ok(Opcode::FilterTag),
            0x51 => Ok(Opcode::FilterLayer),
            0x52 => Ok(Opcode::FilterTeam),
            0x53 => Ok(Opcode::FilterExclude),
            0x54 => Ok(Opcode::SortDedupTargets),
            0x55 => Ok(Opcode::LimitTargets),
            0x56 => Ok(Opcode::CountTargets),
            0x57 => Ok(Opcode::TargetAt),
            0x58 => Ok(Opcode::NearestTarget),
            0x60 => Ok(Opcode::ApplyEffect),
            0x61 => Ok(Opcode::ApplyEffectToTargets),
            0x62 => Ok(Opcode::ApplyEffectDynamic),
            0x63 => Ok(Opcode::ModifyAttribute),
            0x64 => Ok(Opcode::SendEvent),
            0x70 => Ok(Opcode::ScratchReadFloat),
            0x71 => Ok(Opcode::ScratchWriteFloat),
            0x72 => Ok(Opcode::ScratchReadInt),
            0x73 => Ok(Opcode::ScratchWriteInt),
            0x74 => Ok(Opcode::ScratchReadEntity),
            0x75 => Ok(Opcode::ScratchWriteEntity),
            0x80 => Ok(Opcode::ParamFloat),
            0x81 => Ok(Opcode::ParamInt),
            0x82 => Ok(Opcode::ReadSelfAttribute),
            0x83 => Ok(Opcode::WriteSelfAttribute),

            // Gaps inside and after the defined groups are reserved:
            // 0x0B..=0x0F, 0x19..=0x1F, 0x31..=0x3F, 0x47..=0x4F,
            // 0x59..=0x5F, 0x65..=0x6F, 0x76..=0x7F, 0x84..=0xFF.
            _ => Err(DecodeError::ReservedOpcode(value)),
        }
    }
}

/// Static call-shape description of one opcode, consumed by the compiler's
/// register allocator and operand resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpSpec {
    /// Register class expected in each source slot, in wiring order.
    pub operands: &'static [ValueKind],
    /// How many trailing operand slots may be left unwired.
    pub optional: u8,
    /// Register class of the produced value. `Void` allocates nothing.
    pub output: ValueKind,
    /// Pre-assigned destination for the fixed-slot entity loads.
    pub fixed_entity_reg: Option<u8>,
}

const fn op(operands: &'static [ValueKind], output: ValueKind) -> OpSpec {
    OpSpec {
        operands,
        optional: 0,
        output,
        fixed_entity_reg: None,
    }
}

use crate::value::ValueKind::{Bool, Entity, Float, Int, Void};

const NONE: &[ValueKind] = &[];
const F: &[ValueKind] = &[Float];
const FF: &[ValueKind] = &[Float, Float];
const FFF: &[ValueKind] = &[Float, Float, Float];
const B: &[ValueKind] = &[Bool];
const BB: &[ValueKind] = &[Bool, Bool];
const II: &[ValueKind] = &[Int, Int];
const E: &[ValueKind] = &[Entity];
const EF: &[ValueKind] = &[Entity, Float];
const EI: &[ValueKind] = &[Entity, Int];
const EE: &[ValueKind] = &[Entity, Entity];
const BEE: &[ValueKind] = &[Bool, Entity, Entity];
const EFF: &[ValueKind] = &[Entity, Float, Float];

impl Opcode {
    /// The call-shape description for this opcode.
    pub fn spec(self) -> OpSpec {
        match self {
            Opcode::Nop | Opcode::Jump => op(NONE, Void),
            Opcode::JumpIfFalse => op(B, Void),

            Opcode::ConstFloat => op(NONE, Float),
            Opcode::ConstInt => op(NONE, Int),
            Opcode::ConstBool => op(NONE, Bool),

            Opcode::LoadCaster => OpSpec {
                operands: NONE,
                optional: 0,
                output: Entity,
                fixed_entity_reg: Some(CASTER_REGISTER),
            },
            Opcode::LoadTarget => OpSpec {
                operands: NONE,
                optional: 0,
                output: Entity,
                fixed_entity_reg: Some(TARGET_REGISTER),
            },
            Opcode::LoadEffectSource
            | Opcode::LoadEffectTarget
            | Opcode::LoadEffectContext => op(NONE, Entity),

            Opcode::AddFloat
            | Opcode::SubFloat
            | Opcode::MulFloat
            | Opcode::DivFloat
            | Opcode::MinFloat
            | Opcode::MaxFloat => op(FF, Float),
            Opcode::ClampFloat => op(FFF, Float),
            Opcode::AbsFloat | Opcode::NegFloat => op(F, Float),

            Opcode::CompareGtFloat
            | Opcode::CompareLtFloat
            | Opcode::CompareGeFloat
            | Opcode::CompareLeFloat => op(FF, Bool),

            Opcode::AddInt | Opcode::SubInt | Opcode::MulInt => op(II, Int),
            Opcode::CompareEqInt | Opcode::CompareGtInt | Opcode::CompareLtInt => op(II, Bool),

            Opcode::AndBool | Opcode::OrBool => op(BB, Bool),
            Opcode::NotBool => op(B, Bool),
            Opcode::HasTag | Opcode::EntityValid => op(E, Bool),
            Opcode::SelectEntity => op(BEE, Entity),

            Opcode::ReadAttribute => op(E, Float),

            Opcode::QueryCircle
            | Opcode::QueryCone
            | Opcode::QueryRect
            | Opcode::QueryLine
            | Opcode::QueryHexRange
            | Opcode::QueryHexRing
            | Opcode::QueryHexNeighbors => op(E, Void),

            Opcode::FilterTag | Opcode::FilterLayer => op(NONE, Void),
            Opcode::FilterTeam | Opcode::FilterExclude => op(E, Void),
            Opcode::SortDedupTargets | Opcode::LimitTargets => op(NONE, Void),
            Opcode::CountTargets => op(NONE, Int),
            Opcode::TargetAt => op(NONE, Entity),
            Opcode::NearestTarget => op(E, Entity),

            Opcode::ApplyEffect => OpSpec {
                operands: EFF,
                optional: 2,
                output: Void,
                fixed_entity_reg: None,
            },
            Opcode::ApplyEffectToTargets => OpSpec {
                operands: FF,
                optional: 2,
                output: Void,
                fixed_entity_reg: None,
            },
            Opcode::ApplyEffectDynamic => op(EI, Void),
            Opcode::ModifyAttribute | Opcode::SendEvent => op(EF, Void),

            Opcode::ScratchReadFloat => op(E, Float),
            Opcode::ScratchWriteFloat => op(EF, Void),
            Opcode::ScratchReadInt => op(E, Int),
            Opcode::ScratchWriteInt => op(EI, Void),
            Opcode::ScratchReadEntity => op(E, Entity),
            Opcode::ScratchWriteEntity => op(EE, Void),

            Opcode::ParamFloat => op(NONE, Float),
            Opcode::ParamInt => op(NONE, Int),
            Opcode::ReadSelfAttribute => op(E, Float),
            Opcode::WriteSelfAttribute => op(EF, Void),
        }
    }

    /// Canonical name, as written in IR opcode fields and listings.
    pub fn name(self) -> &'static str {
        match self {
            Opcode::Nop => "Nop",
            Opcode::Jump => "Jump",
            Opcode::JumpIfFalse => "JumpIfFalse",
            Opcode::ConstFloat => "ConstFloat",
            Opcode::ConstInt => "ConstInt",
            Opcode::ConstBool => "ConstBool",
            Opcode::LoadCaster => "LoadCaster",
            Opcode::LoadTarget => "LoadTarget",
            Opcode::LoadEffectSource => "LoadEffectSource",
            Opcode::LoadEffectTarget => "LoadEffectTarget",
            Opcode::LoadEffectContext => "LoadEffectContext",
            Opcode::AddFloat => "AddFloat",
            Opcode::SubFloat => "SubFloat",
            Opcode::MulFloat => "MulFloat",
            Opcode::DivFloat => "DivFloat",
            Opcode::MinFloat => "MinFloat",
            Opcode::MaxFloat => "MaxFloat",
            Opcode::ClampFloat => "ClampFloat",
            Opcode::AbsFloat => "AbsFloat",
            Opcode::NegFloat => "NegFloat",
            Opcode::CompareGtFloat => "CompareGtFloat",
            Opcode::CompareLtFloat => "CompareLtFloat",
            Opcode::CompareGeFloat => "CompareGeFloat",
            Opcode::CompareLeFloat => "CompareLeFloat",
            Opcode::AddInt => "AddInt",
            Opcode::SubInt => "SubInt",
            Opcode::MulInt => "MulInt",
            Opcode::CompareEqInt => "CompareEqInt",
            Opcode::CompareGtInt => "CompareGtInt",
            Opcode::CompareLtInt => "CompareLtInt",
            Opcode::AndBool => "AndBool",
            Opcode::OrBool => "OrBool",
            Opcode::NotBool => "NotBool",
            Opcode::HasTag => "HasTag",
            Opcode::EntityValid => "EntityValid",
            Opcode::SelectEntity => "SelectEntity",
            Opcode::ReadAttribute => "ReadAttribute",
            Opcode::QueryCircle => "QueryCircle",
            Opcode::QueryCone => "QueryCone",
            Opcode::QueryRect => "QueryRect",
            Opcode::QueryLine => "QueryLine",
            Opcode::QueryHexRange => "QueryHexRange",
            Opcode::QueryHexRing => "QueryHexRing",
            Opcode::QueryHexNeighbors => "QueryHexNeighbors",
            Opcode::FilterTag => "FilterTag",
            Opcode::FilterLayer => "FilterLayer",
            Opcode::FilterTeam => "FilterTeam",
            Opcode::FilterExclude => "FilterExclude",
            Opcode::SortDedupTargets => "SortDedupTargets",
            Opcode::LimitTargets => "LimitTargets",
            Opcode::CountTargets => "CountTargets",
            Opcode::TargetAt => "TargetAt",
            Opcode::NearestTarget => "NearestTarget",
            Opcode::ApplyEffect => "ApplyEffect",
            Opcode::ApplyEffectToTargets => "ApplyEffectToTargets",
            Opcode::ApplyEffectDynamic => "ApplyEffectDynamic",
            Opcode::ModifyAttribute => "ModifyAttribute",
            Opcode::SendEvent => "SendEvent",
            Opcode::ScratchReadFloat => "ScratchReadFloat",
            Opcode::ScratchWriteFloat => "ScratchWriteFloat",
            Opcode::ScratchReadInt => "ScratchReadInt",
            Opcode::ScratchWriteInt => "ScratchWriteInt",
            Opcode::ScratchReadEntity => "ScratchReadEntity",
            Opcode::ScratchWriteEntity => "ScratchWriteEntity",
            Opcode::ParamFloat => "ParamFloat",
            Opcode::ParamInt => "ParamInt",
            Opcode::ReadSelfAttribute => "ReadSelfAttribute",
            Opcode::WriteSelfAttribute => "WriteSelfAttribute",
        }
    }

    /// Resolve an IR opcode-name string. Case-sensitive.
    pub fn from_name(name: &str) -> Option<Opcode> {
        ALL_OPCODES.iter().copied().find(|op| op.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_opcodes_count() {
        assert_eq!(ALL_OPCODES.len(), 68);
    }

    #[test]
    fn roundtrip_all_valid_opcodes() {
        for &opcode in &ALL_OPCODES {
            let byte = opcode as u8;
            let decoded = Opcode::try_from(byte).unwrap();
            assert_eq!(
                opcode, decoded,
                "roundtrip failed for {opcode:?} ({byte:#04x})"
            );
        }
    }

    #[test]
    fn nop_is_zero() {
        assert_eq!(Opcode::Nop as u8, 0x00);
        assert_eq!(Opcode::try_from(0x00), Ok(Opcode::Nop));
    }

    #[test]
    fn reserved_load_range() {
        for byte in 0x0B..=0x0Fu8 {
            assert_eq!(
                Opcode::try_from(byte),
                Err(DecodeError::ReservedOpcode(byte)),
                "byte {byte:#04x} should be reserved"
            );
        }
    }

    #[test]
    fn reserved_arithmetic_range() {
        for byte in 0x19..=0x1Fu8 {
            assert_eq!(Opcode::try_from(byte), Err(DecodeError::ReservedOpcode(byte)));
        }
    }

    #[test]
    fn reserved_attribute_range() {
        for byte in 0x31..=0x3Fu8 {
            assert_eq!(Opcode::try_from(byte), Err(DecodeError::ReservedOpcode(byte)));
        }
    }

    #[test]
    fn reserved_query_range() {
        for byte in 0x47..=0x4Fu8 {
            assert_eq!(Opcode::try_from(byte), Err(DecodeError::ReservedOpcode(byte)));
        }
    }

    #[test]
    fn reserved_target_range() {
        for byte in 0x59..=0x5Fu8 {
            assert_eq!(Opcode::try_from(byte), Err(DecodeError::ReservedOpcode(byte)));
        }
    }

    #[test]
    fn reserved_effect_range() {
        for byte in 0x65..=0x6Fu8 {
            assert_eq!(Opcode::try_from(byte), Err(DecodeError::ReservedOpcode(byte)));
        }
    }

    #[test]
    fn reserved_scratch_range() {
        for byte in 0x76..=0x7Fu8 {
            assert_eq!(Opcode::try_from(byte), Err(DecodeError::ReservedOpcode(byte)));
        }
    }

    #[test]
    fn reserved_expansion_range() {
        for byte in 0x84..=0xFFu8 {
            assert_eq!(Opcode::try_from(byte), Err(DecodeError::ReservedOpcode(byte)));
        }
    }

    #[test]
    fn every_byte_value_resolves() {
        for byte in 0..=255u8 {
            match Opcode::try_from(byte) {
                Ok(_) | Err(DecodeError::ReservedOpcode(_)) => {}
                other => panic!("unexpected result for byte {byte:#04x}: {other:?}"),
            }
        }
    }

    #[test]
    fn name_roundtrip() {
        for &opcode in &ALL_OPCODES {
            let name = opcode.name();
            assert!(!name.is_empty());
            assert_eq!(Opcode::from_name(name), Some(opcode), "name: {name}");
        }
    }

    #[test]
    fn from_name_rejects_unknown_and_wrong_case() {
        assert_eq!(Opcode::from_name("Fireball"), None);
        assert_eq!(Opcode::from_name("constfloat"), None);
        assert_eq!(Opcode::from_name(""), None);
    }

    #[test]
    fn fixed_registers_only_on_fixed_loads() {
        for &opcode in &ALL_OPCODES {
            let spec = opcode.spec();
            match opcode {
                Opcode::LoadCaster => {
                    assert_eq!(spec.fixed_entity_reg, Some(CASTER_REGISTER));
                }
                Opcode::LoadTarget => {
                    assert_eq!(spec.fixed_entity_reg, Some(TARGET_REGISTER));
                }
                _ => assert_eq!(spec.fixed_entity_reg, None, "{opcode:?}"),
            }
        }
    }

    #[test]
    fn optional_operands_only_on_effect_applications() {
        for &opcode in &ALL_OPCODES {
            let spec = opcode.spec();
            match opcode {
                Opcode::ApplyEffect | Opcode::ApplyEffectToTargets => {
                    assert_eq!(spec.optional, 2);
                }
                _ => assert_eq!(spec.optional, 0, "{opcode:?}"),
            }
            assert!(spec.optional as usize <= spec.operands.len());
        }
    }

    #[test]
    fn operand_counts_fit_source_slots() {
        for &opcode in &ALL_OPCODES {
            assert!(opcode.spec().operands.len() <= 3, "{opcode:?}");
        }
    }

    #[test]
    fn fixed_loads_produce_entities() {
        assert_eq!(Opcode::LoadCaster.spec().output, ValueKind::Entity);
        assert_eq!(Opcode::LoadTarget.spec().output, ValueKind::Entity);
        assert_eq!(Opcode::LoadEffectContext.spec().output, ValueKind::Entity);
    }
}
