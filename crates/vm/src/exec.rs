//! The bounded-step interpreter loop and the public execution entry
//! points.

use crate::dispatch::{DispatchTable, DISPATCH_CAPACITY};
use crate::error::ExecError;
use crate::host::HostApi;
use crate::state::{EffectContext, ExecState, RegisterFile};
use hexweave_common::{CompiledProgram, InlineProgram, Instruction};
use tracing::{debug, trace};

/// Most instructions one execution may process before it is treated as a
/// runaway program. Generous against real content (programs are one
/// instruction per graph node plus jump revisits) and tight enough to
/// bound worst-case latency from a malformed jump loop.
pub const MAX_STEPS_PER_EXECUTION: usize = 2048;

/// Boolean register read as the verdict of a validation-mode run.
pub const VERDICT_REGISTER: u8 = 0;

/// Run an effect program to completion.
///
/// Register banks and the target list are allocated fresh, entity
/// registers 0/1 are pre-populated from `ctx`, and side effects fire in
/// instruction order, at most once per instruction encountered. The final
/// register contents come back for inspection.
pub fn execute_effect(
    program: &CompiledProgram,
    table: &DispatchTable,
    host: &mut dyn HostApi,
    ctx: EffectContext,
) -> Result<RegisterFile, ExecError> {
    let mut state = ExecState::new(host, &program.symbols, &program.graph, ctx);
    run(&mut state, &program.instructions, table)?;
    let ExecState { registers, .. } = state;
    Ok(registers)
}

/// Run a validation program and read back the verdict.
///
/// Identical setup to effect execution except boolean register 0 is
/// pre-seeded to pass; a graph rejects by writing false there. The VM
/// itself does not forbid side-effecting opcodes in validation mode —
/// honoring that is the graph's business.
pub fn execute_validation(
    program: &CompiledProgram,
    table: &DispatchTable,
    host: &mut dyn HostApi,
    ctx: EffectContext,
) -> Result<bool, ExecError> {
    let mut state = ExecState::new(host, &program.symbols, &program.graph, ctx);
    state.registers.set_bool(VERDICT_REGISTER, true);
    run(&mut state, &program.instructions, table)?;
    Ok(state.registers.bool(VERDICT_REGISTER).unwrap_or(true))
}

/// Effect execution of a program embedded in a fixed-capacity buffer.
///
/// The live instructions are copied into a local sequence before
/// dispatch; the surrounding data supplies the graph id and symbol table.
pub fn execute_effect_inline(
    inline: &InlineProgram,
    graph_id: &str,
    symbols: &[String],
    table: &DispatchTable,
    host: &mut dyn HostApi,
    ctx: EffectContext,
) -> Result<RegisterFile, ExecError> {
    let instructions: Vec<Instruction> = inline.as_slice().to_vec();
    let mut state = ExecState::new(host, symbols, graph_id, ctx);
    run(&mut state, &instructions, table)?;
    let ExecState { registers, .. } = state;
    Ok(registers)
}

/// Validation execution of an embedded program.
pub fn execute_validation_inline(
    inline: &InlineProgram,
    graph_id: &str,
    symbols: &[String],
    table: &DispatchTable,
    host: &mut dyn HostApi,
    ctx: EffectContext,
) -> Result<bool, ExecError> {
    let instructions: Vec<Instruction> = inline.as_slice().to_vec();
    let mut state = ExecState::new(host, symbols, graph_id, ctx);
    state.registers.set_bool(VERDICT_REGISTER, true);
    run(&mut state, &instructions, table)?;
    Ok(state.registers.bool(VERDICT_REGISTER).unwrap_or(true))
}

/// The interpreter loop.
///
/// Terminates when the program counter leaves the instruction array.
/// No-ops (opcode 0) are skipped without dispatch but still cost a step;
/// an opcode at or past the table's capacity, or without a registered
/// handler, aborts the execution — a compiled program that trips either
/// is malformed or malicious and must never be silently absorbed.
fn run(
    state: &mut ExecState<'_>,
    instructions: &[Instruction],
    table: &DispatchTable,
) -> Result<(), ExecError> {
    let mut pc = 0usize;
    let mut steps = 0usize;

    while pc < instructions.len() {
        steps += 1;
        if steps > MAX_STEPS_PER_EXECUTION {
            debug!(scope = %state.scope, pc, "step budget exceeded");
            return Err(ExecError::StepBudgetExceeded {
                budget: MAX_STEPS_PER_EXECUTION,
            });
        }

        let instr = &instructions[pc];
        state.pc = pc;

        if instr.op == 0 {
            pc += 1;
            continue;
        }
        if instr.op as usize >= DISPATCH_CAPACITY {
            return Err(ExecError::OpcodeOutOfTable { op: instr.op, at: pc });
        }
        let Some(handler) = table.handler(instr.op) else {
            return Err(ExecError::UnregisteredOpcode { op: instr.op, at: pc });
        };

        trace!(pc, op = instr.op, "dispatch");
        let mut next = pc + 1;
        handler(state, instr, &mut next)?;
        pc = next;
    }

    trace!(scope = %state.scope, steps, "execution complete");
    Ok(())
}
