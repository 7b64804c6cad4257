//! The opcode dispatch table and its handlers.
//!
//! A fixed-size array of handler functions indexed by raw opcode value.
//! The table is an explicit value built by [`DispatchTable::standard`] and
//! owned by whoever assembles the VM; [`DispatchTable::cached`] is a
//! process-wide convenience instance, not required state.
//!
//! Handler contract: given the execution state, the current instruction,
//! and the already-incremented next program counter, a handler may touch
//! any register bank, mutate the target list, call through the host
//! boundary, and (jumps only) move the counter.

use crate::error::ExecError;
use crate::host::HostApi;
use crate::state::ExecState;
use crate::targets::MAX_TARGETS;
use hexweave_common::{EntityHandle, Instruction, Opcode, TeamRelation};
use std::sync::OnceLock;

/// Dispatch-table slots. Larger than the highest defined opcode (0x83) so
/// the catalog can grow without a layout change.
pub const DISPATCH_CAPACITY: usize = 0x90;

/// One opcode handler.
pub type OpHandler = fn(&mut ExecState<'_>, &Instruction, &mut usize) -> Result<(), ExecError>;

/// Immutable table of opcode handlers.
pub struct DispatchTable {
    handlers: [Option<OpHandler>; DISPATCH_CAPACITY],
}

impl DispatchTable {
    /// The full standard catalog.
    ///
    /// Opcode 0 stays unregistered: the interpreter skips no-ops without
    /// dispatching them.
    pub fn standard() -> Self {
        let mut table = DispatchTable {
            handlers: [None; DISPATCH_CAPACITY],
        };

        table.set(Opcode::Jump, op_jump);
        table.set(Opcode::JumpIfFalse, op_jump_if_false);

        table.set(Opcode::ConstFloat, op_const_float);
        table.set(Opcode::ConstInt, op_const_int);
        table.set(Opcode::ConstBool, op_const_bool);

        table.set(Opcode::LoadCaster, op_load_caster);
        table.set(Opcode::LoadTarget, op_load_target);
        table.set(Opcode::LoadEffectSource, op_load_caster);
        table.set(Opcode::LoadEffectTarget, op_load_target);
        table.set(Opcode::LoadEffectContext, op_load_context);

        table.set(Opcode::AddFloat, op_add_float);
        table.set(Opcode::SubFloat, op_sub_float);
        table.set(Opcode::MulFloat, op_mul_float);
        table.set(Opcode::DivFloat, op_div_float);
        table.set(Opcode::MinFloat, op_min_float);
        table.set(Opcode::MaxFloat, op_max_float);
        table.set(Opcode::ClampFloat, op_clamp_float);
        table.set(Opcode::AbsFloat, op_abs_float);
        table.set(Opcode::NegFloat, op_neg_float);

        table.set(Opcode::CompareGtFloat, op_gt_float);
        table.set(Opcode::CompareLtFloat, op_lt_float);
        table.set(Opcode::CompareGeFloat, op_ge_float);
        table.set(Opcode::CompareLeFloat, op_le_float);

        table.set(Opcode::AddInt, op_add_int);
        table.set(Opcode::SubInt, op_sub_int);
        table.set(Opcode::MulInt, op_mul_int);
        table.set(Opcode::CompareEqInt, op_eq_int);
        table.set(Opcode::CompareGtInt, op_gt_int);
        table.set(Opcode::CompareLtInt, op_lt_int);

        table.set(Opcode::AndBool, op_and_bool);
        table.set(Opcode::OrBool, op_or_bool);
        table.set(Opcode::NotBool, op_not_bool);
        table.set(Opcode::HasTag, op_has_tag);
        table.set(Opcode::EntityValid, op_entity_valid);
        table.set(Opcode::SelectEntity, op_select_entity);

        table.set(Opcode::ReadAttribute, op_read_attribute);

        table.set(Opcode::QueryCircle, op_query_circle);
        table.set(Opcode::QueryCone, op_query_cone);
        table.set(Opcode::QueryRect, op_query_rect);
        table.set(Opcode::QueryLine, op_query_line);
        table.set(Opcode::QueryHexRange, op_query_hex_range);
        table.set(Opcode::QueryHexRing, op_query_hex_ring);
        table.set(Opcode::QueryHexNeighbors, op_query_hex_neighbors);

        table.set(Opcode::FilterTag, op_filter_tag);
        table.set(Opcode::FilterLayer, op_filter_layer);
        table.set(Opcode::FilterTeam, op_filter_team);
        table.set(Opcode::FilterExclude, op_filter_exclude);
        table.set(Opcode::SortDedupTargets, op_sort_dedup);
        table.set(Opcode::LimitTargets, op_limit_targets);
        table.set(Opcode::CountTargets, op_count_targets);
        table.set(Opcode::TargetAt, op_target_at);
        table.set(Opcode::NearestTarget, op_nearest_target);

        table.set(Opcode::ApplyEffect, op_apply_effect);
        table.set(Opcode::ApplyEffectToTargets, op_apply_effect_to_targets);
        table.set(Opcode::ApplyEffectDynamic, op_apply_effect_dynamic);
        table.set(Opcode::ModifyAttribute, op_modify_attribute);
        table.set(Opcode::SendEvent, op_send_event);

        table.set(Opcode::ScratchReadFloat, op_scratch_read_float);
        table.set(Opcode::ScratchWriteFloat, op_scratch_write_float);
        table.set(Opcode::ScratchReadInt, op_scratch_read_int);
        table.set(Opcode::ScratchWriteInt, op_scratch_write_int);
        table.set(Opcode::ScratchReadEntity, op_scratch_read_entity);
        table.set(Opcode::ScratchWriteEntity, op_scratch_write_entity);

        table.set(Opcode::ParamFloat, op_param_float);
        table.set(Opcode::ParamInt, op_param_int);
        table.set(Opcode::ReadSelfAttribute, op_read_self_attribute);
        table.set(Opcode::WriteSelfAttribute, op_write_self_attribute);

        table
    }

    /// A process-cached standard table. Convenience only; callers that
    /// want to own their table build one with [`DispatchTable::standard`].
    pub fn cached() -> &'static DispatchTable {
        static TABLE: OnceLock<DispatchTable> = OnceLock::new();
        TABLE.get_or_init(DispatchTable::standard)
    }

    fn set(&mut self, op: Opcode, handler: OpHandler) {
        self.handlers[op as u8 as usize] = Some(handler);
    }

    /// Handler registered for a raw opcode value, if any.
    pub fn handler(&self, op: u8) -> Option<OpHandler> {
        self.handlers.get(op as usize).copied().flatten()
    }
}

/// Jump targets are relative to the jumping instruction itself; offset 0
/// re-executes it.
fn jump_target(pc: usize, offset: i32) -> Result<usize, ExecError> {
    let target = pc as i64 + offset as i64;
    if target < 0 {
        return Err(ExecError::JumpOutOfRange { at: pc, target });
    }
    Ok(target as usize)
}

// ---- Control flow ----

fn op_jump(state: &mut ExecState<'_>, instr: &Instruction, next: &mut usize) -> Result<(), ExecError> {
    *next = jump_target(state.pc, instr.imm_i)?;
    Ok(())
}

fn op_jump_if_false(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    next: &mut usize,
) -> Result<(), ExecError> {
    if !state.read_bool(instr.src[0])? {
        *next = jump_target(state.pc, instr.imm_i)?;
    }
    Ok(())
}

// ---- Constants ----

fn op_const_float(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    state.write_float(instr.dst, instr.imm_f)
}

fn op_const_int(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    state.write_int(instr.dst, instr.imm_i)
}

fn op_const_bool(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    state.write_bool(instr.dst, instr.imm_i != 0)
}

// ---- Entity loads ----
// LoadCaster/LoadTarget write through their fixed registers; the context
// mirrors land wherever the compiler allocated them.

fn op_load_caster(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let caster = state.caster;
    state.write_entity(instr.dst, caster)
}

fn op_load_target(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let target = state.target;
    state.write_entity(instr.dst, target)
}

fn op_load_context(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let context = state.target_context;
    state.write_entity(instr.dst, context)
}

// ---- Float arithmetic ----

fn float_binary(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    f: fn(f32, f32) -> f32,
) -> Result<(), ExecError> {
    let a = state.read_float(instr.src[0])?;
    let b = state.read_float(instr.src[1])?;
    state.write_float(instr.dst, f(a, b))
}

fn float_unary(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    f: fn(f32) -> f32,
) -> Result<(), ExecError> {
    let a = state.read_float(instr.src[0])?;
    state.write_float(instr.dst, f(a))
}

fn op_add_float(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    float_binary(s, i, |a, b| a + b)
}

fn op_sub_float(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    float_binary(s, i, |a, b| a - b)
}

fn op_mul_float(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    float_binary(s, i, |a, b| a * b)
}

fn op_div_float(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    // Division by zero reads as 0.0; graphs keep executing.
    float_binary(s, i, |a, b| if b == 0.0 { 0.0 } else { a / b })
}

fn op_min_float(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    float_binary(s, i, f32::min)
}

fn op_max_float(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    float_binary(s, i, f32::max)
}

fn op_clamp_float(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let value = state.read_float(instr.src[0])?;
    let lo = state.read_float(instr.src[1])?;
    let hi = state.read_float(instr.src[2])?;
    // max-then-min never panics, whatever the bounds ordering.
    state.write_float(instr.dst, value.max(lo).min(hi))
}

fn op_abs_float(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    float_unary(s, i, f32::abs)
}

fn op_neg_float(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    float_unary(s, i, |a| -a)
}

// ---- Comparisons ----

fn float_compare(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    f: fn(f32, f32) -> bool,
) -> Result<(), ExecError> {
    let a = state.read_float(instr.src[0])?;
    let b = state.read_float(instr.src[1])?;
    state.write_bool(instr.dst, f(a, b))
}

fn op_gt_float(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    float_compare(s, i, |a, b| a > b)
}

fn op_lt_float(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    float_compare(s, i, |a, b| a < b)
}

fn op_ge_float(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    float_compare(s, i, |a, b| a >= b)
}

fn op_le_float(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    float_compare(s, i, |a, b| a <= b)
}

// ---- Int arithmetic ----

fn int_binary(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    f: fn(i32, i32) -> i32,
) -> Result<(), ExecError> {
    let a = state.read_int(instr.src[0])?;
    let b = state.read_int(instr.src[1])?;
    state.write_int(instr.dst, f(a, b))
}

fn int_compare(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    f: fn(i32, i32) -> bool,
) -> Result<(), ExecError> {
    let a = state.read_int(instr.src[0])?;
    let b = state.read_int(instr.src[1])?;
    state.write_bool(instr.dst, f(a, b))
}

fn op_add_int(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    int_binary(s, i, i32::wrapping_add)
}

fn op_sub_int(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    int_binary(s, i, i32::wrapping_sub)
}

fn op_mul_int(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    int_binary(s, i, i32::wrapping_mul)
}

fn op_eq_int(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    int_compare(s, i, |a, b| a == b)
}

fn op_gt_int(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    int_compare(s, i, |a, b| a > b)
}

fn op_lt_int(s: &mut ExecState<'_>, i: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    int_compare(s, i, |a, b| a < b)
}

// ---- Boolean logic and entity predicates ----

fn op_and_bool(state: &mut ExecState<'_>, instr: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    let a = state.read_bool(instr.src[0])?;
    let b = state.read_bool(instr.src[1])?;
    state.write_bool(instr.dst, a && b)
}

fn op_or_bool(state: &mut ExecState<'_>, instr: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    let a = state.read_bool(instr.src[0])?;
    let b = state.read_bool(instr.src[1])?;
    state.write_bool(instr.dst, a || b)
}

fn op_not_bool(state: &mut ExecState<'_>, instr: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    let a = state.read_bool(instr.src[0])?;
    state.write_bool(instr.dst, !a)
}

fn op_has_tag(state: &mut ExecState<'_>, instr: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    let entity = state.read_entity(instr.src[0])?;
    let tag = state.symbol(instr.imm_i)?;
    let tagged = state.host.has_tag(entity, tag);
    state.write_bool(instr.dst, tagged)
}

fn op_entity_valid(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let entity = state.read_entity(instr.src[0])?;
    let valid = entity.is_some() && state.host.is_alive(entity);
    state.write_bool(instr.dst, valid)
}

fn op_select_entity(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let condition = state.read_bool(instr.src[0])?;
    let chosen = if condition {
        state.read_entity(instr.src[1])?
    } else {
        state.read_entity(instr.src[2])?
    };
    state.write_entity(instr.dst, chosen)
}

// ---- Attribute reads ----

fn op_read_attribute(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let entity = state.read_entity(instr.src[0])?;
    let attribute = state.symbol(instr.imm_i)?;
    // Dead or attribute-less entities read as 0.
    let value = state.host.attribute(entity, attribute).unwrap_or(0.0);
    state.write_float(instr.dst, value)
}

// ---- Spatial queries ----

/// Run a shape query into the scratch buffer and rebuild the target list
/// from the result.
fn run_shape_query(
    state: &mut ExecState<'_>,
    query: impl FnOnce(&dyn HostApi, &mut [EntityHandle]) -> usize,
) {
    let ExecState {
        host,
        scratch,
        targets,
        ..
    } = state;
    let count = query(&**host, &mut scratch[..]).min(MAX_TARGETS);
    targets.fill_from(&scratch[..count]);
}

fn op_query_circle(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let center_entity = state.read_entity(instr.src[0])?;
    let radius = instr.imm_f;
    match state.host.position(center_entity) {
        Some(center) => run_shape_query(state, |host, out| host.query_circle(center, radius, out)),
        None => state.targets.clear(),
    }
    Ok(())
}

fn op_query_cone(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let apex_entity = state.read_entity(instr.src[0])?;
    let radius = instr.imm_f;
    let half_angle = instr.imm_i as f32;
    let toward = state.target_pos;
    match state.host.position(apex_entity) {
        Some(apex) => run_shape_query(state, |host, out| {
            host.query_cone(apex, toward, radius, half_angle, out)
        }),
        None => state.targets.clear(),
    }
    Ok(())
}

fn op_query_rect(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let origin_entity = state.read_entity(instr.src[0])?;
    let length = instr.imm_f;
    let half_width = f32::from_bits(instr.imm_i as u32);
    let toward = state.target_pos;
    match state.host.position(origin_entity) {
        Some(origin) => run_shape_query(state, |host, out| {
            host.query_rect(origin, toward, length, half_width, out)
        }),
        None => state.targets.clear(),
    }
    Ok(())
}

fn op_query_line(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let start_entity = state.read_entity(instr.src[0])?;
    let length = instr.imm_f;
    let radius = f32::from_bits(instr.imm_i as u32);
    let toward = state.target_pos;
    match state.host.position(start_entity) {
        Some(start) => run_shape_query(state, |host, out| {
            host.query_line(start, toward, length, radius, out)
        }),
        None => state.targets.clear(),
    }
    Ok(())
}

fn op_query_hex_range(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let center_entity = state.read_entity(instr.src[0])?;
    let radius = instr.imm_i;
    match state.host.hex_position(center_entity) {
        Some(center) => {
            run_shape_query(state, |host, out| host.query_hex_range(center, radius, out))
        }
        None => state.targets.clear(),
    }
    Ok(())
}

fn op_query_hex_ring(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let center_entity = state.read_entity(instr.src[0])?;
    let radius = instr.imm_i;
    match state.host.hex_position(center_entity) {
        Some(center) => {
            run_shape_query(state, |host, out| host.query_hex_ring(center, radius, out))
        }
        None => state.targets.clear(),
    }
    Ok(())
}

fn op_query_hex_neighbors(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let center_entity = state.read_entity(instr.src[0])?;
    match state.host.hex_position(center_entity) {
        Some(center) => run_shape_query(state, |host, out| host.query_hex_neighbors(center, out)),
        None => state.targets.clear(),
    }
    Ok(())
}

// ---- Target-list filters and reducers ----

fn op_filter_tag(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let tag = state.symbol(instr.imm_i)?;
    let ExecState { host, targets, .. } = state;
    targets.retain(|entity| host.has_tag(entity, tag));
    Ok(())
}

fn op_filter_layer(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let mask = instr.imm_i as u32;
    let ExecState { host, targets, .. } = state;
    targets.retain(|entity| host.layer_mask(entity) & mask != 0);
    Ok(())
}

fn op_filter_team(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let reference = state.read_entity(instr.src[0])?;
    // An unknown relation code matches nothing.
    let Some(wanted) = TeamRelation::from_code(instr.imm_i) else {
        state.targets.clear();
        return Ok(());
    };
    let ExecState { host, targets, .. } = state;
    targets.retain(|entity| host.relationship(reference, entity) == wanted);
    Ok(())
}

fn op_filter_exclude(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let excluded = state.read_entity(instr.src[0])?;
    state.targets.retain(|entity| entity != excluded);
    Ok(())
}

fn op_sort_dedup(state: &mut ExecState<'_>, _: &Instruction, _: &mut usize) -> Result<(), ExecError> {
    state.targets.sort_dedup();
    Ok(())
}

fn op_limit_targets(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    state.targets.truncate(instr.imm_i.max(0) as usize);
    Ok(())
}

fn op_count_targets(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let count = state.targets.len() as i32;
    state.write_int(instr.dst, count)
}

fn op_target_at(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let entity = usize::try_from(instr.imm_i)
        .ok()
        .and_then(|index| state.targets.get(index))
        .unwrap_or(EntityHandle::NONE);
    state.write_entity(instr.dst, entity)
}

fn op_nearest_target(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let reference = state.read_entity(instr.src[0])?;
    let nearest = match state.host.position(reference) {
        Some(origin) => {
            let ExecState { host, targets, .. } = state;
            targets
                .nearest_by(origin, |entity| host.position(entity))
                .unwrap_or(EntityHandle::NONE)
        }
        None => EntityHandle::NONE,
    };
    state.write_entity(instr.dst, nearest)
}

// ---- Effect actions ----

/// Read the wired optional float arguments. `base` is the first source
/// slot carrying one.
fn effect_args(
    state: &ExecState<'_>,
    instr: &Instruction,
    base: usize,
) -> Result<([f32; 2], usize), ExecError> {
    let count = ((instr.flags & 0x03) as usize).min(2);
    let mut args = [0.0f32; 2];
    for slot in 0..count {
        args[slot] = state.read_float(instr.src[base + slot])?;
    }
    Ok((args, count))
}

fn op_apply_effect(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let target = state.read_entity(instr.src[0])?;
    let (args, count) = effect_args(state, instr, 1)?;
    let template = state.symbol(instr.imm_i)?;
    let caster = state.caster;
    state.host.apply_effect(target, template, caster, &args[..count]);
    Ok(())
}

fn op_apply_effect_to_targets(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let (args, count) = effect_args(state, instr, 0)?;
    let template = state.symbol(instr.imm_i)?;
    let caster = state.caster;
    for index in 0..state.targets.len() {
        let Some(target) = state.targets.get(index) else {
            break;
        };
        state.host.apply_effect(target, template, caster, &args[..count]);
    }
    Ok(())
}

fn op_apply_effect_dynamic(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let target = state.read_entity(instr.src[0])?;
    let symbol_index = state.read_int(instr.src[1])?;
    let template = state.symbol(symbol_index)?;
    let caster = state.caster;
    state.host.apply_effect(target, template, caster, &[]);
    Ok(())
}

fn op_modify_attribute(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let entity = state.read_entity(instr.src[0])?;
    let delta = state.read_float(instr.src[1])?;
    let attribute = state.symbol(instr.imm_i)?;
    state.host.modify_attribute(entity, attribute, delta);
    Ok(())
}

fn op_send_event(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let entity = state.read_entity(instr.src[0])?;
    let magnitude = state.read_float(instr.src[1])?;
    let tag = state.symbol(instr.imm_i)?;
    state.host.send_event(entity, tag, magnitude);
    Ok(())
}

// ---- Per-entity scratch ----

fn op_scratch_read_float(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let entity = state.read_entity(instr.src[0])?;
    let key = state.symbol(instr.imm_i)?;
    let value = state.host.scratch_float(entity, key).unwrap_or(0.0);
    state.write_float(instr.dst, value)
}

fn op_scratch_write_float(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let entity = state.read_entity(instr.src[0])?;
    let value = state.read_float(instr.src[1])?;
    let key = state.symbol(instr.imm_i)?;
    state.host.set_scratch_float(entity, key, value);
    Ok(())
}

fn op_scratch_read_int(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let entity = state.read_entity(instr.src[0])?;
    let key = state.symbol(instr.imm_i)?;
    let value = state.host.scratch_int(entity, key).unwrap_or(0);
    state.write_int(instr.dst, value)
}

fn op_scratch_write_int(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let entity = state.read_entity(instr.src[0])?;
    let value = state.read_int(instr.src[1])?;
    let key = state.symbol(instr.imm_i)?;
    state.host.set_scratch_int(entity, key, value);
    Ok(())
}

fn op_scratch_read_entity(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let entity = state.read_entity(instr.src[0])?;
    let key = state.symbol(instr.imm_i)?;
    let value = state
        .host
        .scratch_entity(entity, key)
        .unwrap_or(EntityHandle::NONE);
    state.write_entity(instr.dst, value)
}

fn op_scratch_write_entity(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let entity = state.read_entity(instr.src[0])?;
    let value = state.read_entity(instr.src[1])?;
    let key = state.symbol(instr.imm_i)?;
    state.host.set_scratch_entity(entity, key, value);
    Ok(())
}

// ---- Config parameters and base attributes ----

fn op_param_float(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let key = state.symbol(instr.imm_i)?;
    let value = state.host.config_float(state.scope, key).unwrap_or(0.0);
    state.write_float(instr.dst, value)
}

fn op_param_int(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let key = state.symbol(instr.imm_i)?;
    let value = state.host.config_int(state.scope, key).unwrap_or(0);
    state.write_int(instr.dst, value)
}

fn op_read_self_attribute(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let entity = state.read_entity(instr.src[0])?;
    let attribute = state.symbol(instr.imm_i)?;
    let value = state.host.self_attribute(entity, attribute).unwrap_or(0.0);
    state.write_float(instr.dst, value)
}

fn op_write_self_attribute(
    state: &mut ExecState<'_>,
    instr: &Instruction,
    _: &mut usize,
) -> Result<(), ExecError> {
    let entity = state.read_entity(instr.src[0])?;
    let value = state.read_float(instr.src[1])?;
    let attribute = state.symbol(instr.imm_i)?;
    state.host.set_self_attribute(entity, attribute, value);
    Ok(())
}
