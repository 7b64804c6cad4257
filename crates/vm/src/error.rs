//! Fatal execution errors.
//!
//! These are the VM-integrity conditions: they mean the compiled program
//! is corrupted, malicious, or stuck, and the single execution must abort.
//! Host-data misses (dead entities, absent scratch or config keys) are NOT
//! errors — each opcode documents the default it reads instead.

use thiserror::Error;

/// Conditions that abort one execution.
///
/// Every variant except the step budget includes the instruction index
/// (`at`) for debugging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The step counter passed the per-execution maximum; the program is
    /// treated as runaway and never silently truncated.
    #[error("runaway program: step budget of {budget} instructions exceeded")]
    StepBudgetExceeded { budget: usize },

    /// Opcode value at or beyond the dispatch table's capacity.
    #[error("opcode {op:#04x} at instruction {at} is beyond dispatch capacity")]
    OpcodeOutOfTable { op: u8, at: usize },

    /// In-capacity opcode with no registered handler.
    #[error("unregistered opcode {op:#04x} at instruction {at}")]
    UnregisteredOpcode { op: u8, at: usize },

    /// Register index past its bank's capacity.
    #[error("{bank} register {index} out of range at instruction {at}")]
    RegisterOutOfRange {
        bank: &'static str,
        index: u8,
        at: usize,
    },

    /// Jump landing before instruction 0.
    #[error("jump to {target} at instruction {at} leaves the program")]
    JumpOutOfRange { at: usize, target: i64 },

    /// Symbol index past the program's interned table.
    #[error("symbol index {index} out of table bounds at instruction {at}")]
    BadSymbol { index: i32, at: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        assert_eq!(
            ExecError::StepBudgetExceeded { budget: 2048 }.to_string(),
            "runaway program: step budget of 2048 instructions exceeded"
        );
        assert_eq!(
            ExecError::UnregisteredOpcode { op: 0x4F, at: 3 }.to_string(),
            "unregistered opcode 0x4f at instruction 3"
        );
        assert_eq!(
            ExecError::RegisterOutOfRange {
                bank: "float",
                index: 200,
                at: 0
            }
            .to_string(),
            "float register 200 out of range at instruction 0"
        );
        assert_eq!(
            ExecError::JumpOutOfRange { at: 4, target: -2 }.to_string(),
            "jump to -2 at instruction 4 leaves the program"
        );
    }
}
