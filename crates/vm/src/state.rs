//! Per-execution mutable state.
//!
//! Everything here is allocated fresh for one Execute call and discarded
//! at its end. All storage is fixed-capacity; nothing grows during
//! execution.

use crate::error::ExecError;
use crate::host::HostApi;
use crate::targets::{TargetList, MAX_TARGETS};
use hexweave_common::{EntityHandle, Vec2, CASTER_REGISTER, REGISTERS_PER_BANK, TARGET_REGISTER};

/// Four independently indexed, fixed-capacity register banks.
#[derive(Debug, Clone)]
pub struct RegisterFile {
    floats: [f32; REGISTERS_PER_BANK],
    ints: [i32; REGISTERS_PER_BANK],
    bools: [bool; REGISTERS_PER_BANK],
    entities: [EntityHandle; REGISTERS_PER_BANK],
}

impl RegisterFile {
    pub fn new() -> Self {
        RegisterFile {
            floats: [0.0; REGISTERS_PER_BANK],
            ints: [0; REGISTERS_PER_BANK],
            bools: [false; REGISTERS_PER_BANK],
            entities: [EntityHandle::NONE; REGISTERS_PER_BANK],
        }
    }

    pub fn float(&self, index: u8) -> Option<f32> {
        self.floats.get(index as usize).copied()
    }

    pub fn int(&self, index: u8) -> Option<i32> {
        self.ints.get(index as usize).copied()
    }

    pub fn bool(&self, index: u8) -> Option<bool> {
        self.bools.get(index as usize).copied()
    }

    pub fn entity(&self, index: u8) -> Option<EntityHandle> {
        self.entities.get(index as usize).copied()
    }

    pub fn set_float(&mut self, index: u8, value: f32) -> bool {
        set(&mut self.floats, index, value)
    }

    pub fn set_int(&mut self, index: u8, value: i32) -> bool {
        set(&mut self.ints, index, value)
    }

    pub fn set_bool(&mut self, index: u8, value: bool) -> bool {
        set(&mut self.bools, index, value)
    }

    pub fn set_entity(&mut self, index: u8, value: EntityHandle) -> bool {
        set(&mut self.entities, index, value)
    }
}

fn set<T>(bank: &mut [T], index: u8, value: T) -> bool {
    match bank.get_mut(index as usize) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

/// The per-call identity handles an execution runs under.
#[derive(Debug, Clone, Copy)]
pub struct EffectContext {
    /// The entity the graph executes on behalf of.
    pub caster: EntityHandle,
    /// The explicitly selected target, if the trigger had one.
    pub target: EntityHandle,
    /// A secondary context entity for nested or derived graphs.
    pub target_context: EntityHandle,
    /// The aimed-at world position; shape queries orient toward it.
    pub target_pos: Vec2,
}

impl EffectContext {
    pub fn new(caster: EntityHandle, target: EntityHandle) -> Self {
        EffectContext {
            caster,
            target,
            target_context: EntityHandle::NONE,
            target_pos: Vec2::default(),
        }
    }

    pub fn with_context(mut self, context: EntityHandle) -> Self {
        self.target_context = context;
        self
    }

    pub fn with_target_pos(mut self, pos: Vec2) -> Self {
        self.target_pos = pos;
        self
    }
}

/// Mutable state of one execution: register banks, target list, query
/// scratch, identity handles, and the host boundary.
pub struct ExecState<'run> {
    pub registers: RegisterFile,
    pub targets: TargetList,
    /// Raw query output buffer; the target list is rebuilt from it after
    /// each spatial query.
    pub scratch: [EntityHandle; MAX_TARGETS],
    pub caster: EntityHandle,
    pub target: EntityHandle,
    pub target_context: EntityHandle,
    pub target_pos: Vec2,
    pub host: &'run mut dyn HostApi,
    /// Interned symbol table of the running program.
    pub symbols: &'run [String],
    /// Config-parameter scope: the running graph's id.
    pub scope: &'run str,
    /// Index of the instruction currently dispatched; handlers cite it in
    /// fatal errors and jump targets are relative to it.
    pub pc: usize,
}

impl<'run> ExecState<'run> {
    /// Fresh state with entity registers 0/1 pre-populated from the
    /// context.
    pub fn new(
        host: &'run mut dyn HostApi,
        symbols: &'run [String],
        scope: &'run str,
        ctx: EffectContext,
    ) -> Self {
        let mut registers = RegisterFile::new();
        registers.set_entity(CASTER_REGISTER, ctx.caster);
        registers.set_entity(TARGET_REGISTER, ctx.target);
        ExecState {
            registers,
            targets: TargetList::new(),
            scratch: [EntityHandle::NONE; MAX_TARGETS],
            caster: ctx.caster,
            target: ctx.target,
            target_context: ctx.target_context,
            target_pos: ctx.target_pos,
            host,
            symbols,
            scope,
            pc: 0,
        }
    }

    pub fn read_float(&self, index: u8) -> Result<f32, ExecError> {
        self.registers
            .float(index)
            .ok_or(self.register_error("float", index))
    }

    pub fn read_int(&self, index: u8) -> Result<i32, ExecError> {
        self.registers
            .int(index)
            .ok_or(self.register_error("int", index))
    }

    pub fn read_bool(&self, index: u8) -> Result<bool, ExecError> {
        self.registers
            .bool(index)
            .ok_or(self.register_error("bool", index))
    }

    pub fn read_entity(&self, index: u8) -> Result<EntityHandle, ExecError> {
        self.registers
            .entity(index)
            .ok_or(self.register_error("entity", index))
    }

    pub fn write_float(&mut self, index: u8, value: f32) -> Result<(), ExecError> {
        if self.registers.set_float(index, value) {
            Ok(())
        } else {
            Err(self.register_error("float", index))
        }
    }

    pub fn write_int(&mut self, index: u8, value: i32) -> Result<(), ExecError> {
        if self.registers.set_int(index, value) {
            Ok(())
        } else {
            Err(self.register_error("int", index))
        }
    }

    pub fn write_bool(&mut self, index: u8, value: bool) -> Result<(), ExecError> {
        if self.registers.set_bool(index, value) {
            Ok(())
        } else {
            Err(self.register_error("bool", index))
        }
    }

    pub fn write_entity(&mut self, index: u8, value: EntityHandle) -> Result<(), ExecError> {
        if self.registers.set_entity(index, value) {
            Ok(())
        } else {
            Err(self.register_error("entity", index))
        }
    }

    /// Resolve an interned symbol index carried in an integer immediate.
    pub fn symbol(&self, index: i32) -> Result<&'run str, ExecError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.symbols.get(i))
            .map(String::as_str)
            .ok_or(ExecError::BadSymbol {
                index,
                at: self.pc,
            })
    }

    fn register_error(&self, bank: &'static str, index: u8) -> ExecError {
        ExecError::RegisterOutOfRange {
            bank,
            index,
            at: self.pc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NullHost;

    #[test]
    fn register_file_starts_zeroed() {
        let regs = RegisterFile::new();
        assert_eq!(regs.float(0), Some(0.0));
        assert_eq!(regs.int(5), Some(0));
        assert_eq!(regs.bool(31), Some(false));
        assert_eq!(regs.entity(2), Some(EntityHandle::NONE));
    }

    #[test]
    fn out_of_range_access() {
        let mut regs = RegisterFile::new();
        assert_eq!(regs.float(REGISTERS_PER_BANK as u8), None);
        assert!(!regs.set_int(200, 1));
    }

    #[test]
    fn state_preseeds_caster_and_target() {
        let mut host = NullHost;
        let ctx = EffectContext::new(EntityHandle::from_raw(7), EntityHandle::from_raw(9));
        let state = ExecState::new(&mut host, &[], "g", ctx);
        assert_eq!(
            state.registers.entity(CASTER_REGISTER),
            Some(EntityHandle::from_raw(7))
        );
        assert_eq!(
            state.registers.entity(TARGET_REGISTER),
            Some(EntityHandle::from_raw(9))
        );
    }

    #[test]
    fn symbol_resolution_and_bounds() {
        let mut host = NullHost;
        let symbols = vec!["burn".to_string()];
        let ctx = EffectContext::new(EntityHandle::NONE, EntityHandle::NONE);
        let state = ExecState::new(&mut host, &symbols, "g", ctx);
        assert_eq!(state.symbol(0), Ok("burn"));
        assert_eq!(
            state.symbol(1),
            Err(ExecError::BadSymbol { index: 1, at: 0 })
        );
        assert_eq!(
            state.symbol(-1),
            Err(ExecError::BadSymbol { index: -1, at: 0 })
        );
    }

    #[test]
    fn register_errors_cite_the_current_instruction() {
        let mut host = NullHost;
        let ctx = EffectContext::new(EntityHandle::NONE, EntityHandle::NONE);
        let mut state = ExecState::new(&mut host, &[], "g", ctx);
        state.pc = 17;
        assert_eq!(
            state.read_float(255),
            Err(ExecError::RegisterOutOfRange {
                bank: "float",
                index: 255,
                at: 17
            })
        );
    }
}
