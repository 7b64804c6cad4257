//! Decode errors for compiled Hexweave programs.

use thiserror::Error;

/// Errors that occur while decoding compiled-program bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Opcode byte falls in a reserved range of the catalog.
    #[error("reserved opcode: {0:#04x}")]
    ReservedOpcode(u8),

    /// Instruction stream length is not a multiple of 16.
    #[error("invalid instruction stream length: {0} (must be multiple of 16)")]
    InvalidLength(usize),

    /// Program blob ended before a declared field was complete.
    #[error("unexpected end of program blob at byte {at}")]
    UnexpectedEof { at: usize },

    /// A symbol-table entry is not valid UTF-8.
    #[error("symbol {index} is not valid UTF-8")]
    InvalidSymbol { index: usize },

    /// Program has more instructions than an inline buffer can hold.
    #[error("program of {len} instructions exceeds inline capacity {capacity}")]
    InlineCapacityExceeded { len: usize, capacity: usize },
}
