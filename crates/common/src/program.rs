//! Compiled-program representations.
//!
//! [`CompiledProgram`] is the interchange form: graph id, interned symbol
//! table, and the flat instruction array, serializable as one binary blob.
//! [`InlineProgram`] is the fixed-capacity embedded form for programs that
//! live inline inside larger bounded-size data; executors copy it into a
//! local instruction sequence before dispatch.

use crate::error::DecodeError;
use crate::instruction::Instruction;

/// Most instructions an [`InlineProgram`] can embed.
pub const MAX_INLINE_INSTRUCTIONS: usize = 32;

/// A compiled ability graph.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledProgram {
    /// Id of the source graph; also the config-parameter scope at run time.
    pub graph: String,
    /// Interned symbol strings, in first-occurrence order. Instructions
    /// reference these by index and never carry strings.
    pub symbols: Vec<String>,
    /// The instruction stream, in execution order.
    pub instructions: Vec<Instruction>,
}

impl CompiledProgram {
    pub fn new(
        graph: impl Into<String>,
        symbols: Vec<String>,
        instructions: Vec<Instruction>,
    ) -> Self {
        CompiledProgram {
            graph: graph.into(),
            symbols,
            instructions,
        }
    }

    /// Encode the program as a flat binary blob.
    ///
    /// Layout, all little-endian: graph-id length (u16) + bytes, symbol
    /// count (u16) then per symbol length (u16) + bytes, instruction
    /// count (u32) then 16 bytes per instruction.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.instructions.len() * 16 + 64);

        bytes.extend_from_slice(&(self.graph.len() as u16).to_le_bytes());
        bytes.extend_from_slice(self.graph.as_bytes());

        bytes.extend_from_slice(&(self.symbols.len() as u16).to_le_bytes());
        for sym in &self.symbols {
            bytes.extend_from_slice(&(sym.len() as u16).to_le_bytes());
            bytes.extend_from_slice(sym.as_bytes());
        }

        bytes.extend_from_slice(&(self.instructions.len() as u32).to_le_bytes());
        for instr in &self.instructions {
            bytes.extend_from_slice(&instr.encode());
        }

        bytes
    }

    /// Decode a blob produced by [`CompiledProgram::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut cursor = Cursor { bytes, at: 0 };

        let graph_len = cursor.u16()? as usize;
        let graph = cursor.str_bytes(graph_len, 0)?;

        let symbol_count = cursor.u16()? as usize;
        let mut symbols = Vec::with_capacity(symbol_count);
        for index in 0..symbol_count {
            let len = cursor.u16()? as usize;
            symbols.push(cursor.str_bytes(len, index)?);
        }

        let instr_count = cursor.u32()? as usize;
        let mut instructions = Vec::with_capacity(instr_count);
        for _ in 0..instr_count {
            instructions.push(Instruction::decode(cursor.array16()?));
        }

        Ok(CompiledProgram {
            graph,
            symbols,
            instructions,
        })
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    at: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .at
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(DecodeError::UnexpectedEof { at: self.at })?;
        let slice = &self.bytes[self.at..end];
        self.at = end;
        Ok(slice)
    }

    fn u16(&mut self) -> Result<u16, DecodeError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn array16(&mut self) -> Result<[u8; 16], DecodeError> {
        let b = self.take(16)?;
        Ok(b.try_into().expect("take(16) yields 16 bytes"))
    }

    fn str_bytes(&mut self, len: usize, index: usize) -> Result<String, DecodeError> {
        let b = self.take(len)?;
        String::from_utf8(b.to_vec()).map_err(|_| DecodeError::InvalidSymbol { index })
    }
}

/// A program embedded in a fixed-capacity buffer.
///
/// Carries no graph id or symbol table of its own; the surrounding data
/// supplies both at execution time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlineProgram {
    instructions: [Instruction; MAX_INLINE_INSTRUCTIONS],
    len: u16,
}

impl InlineProgram {
    /// Embed the instruction stream of a compiled program.
    pub fn from_program(program: &CompiledProgram) -> Result<Self, DecodeError> {
        Self::from_slice(&program.instructions)
    }

    /// Embed a raw instruction slice.
    pub fn from_slice(instructions: &[Instruction]) -> Result<Self, DecodeError> {
        if instructions.len() > MAX_INLINE_INSTRUCTIONS {
            return Err(DecodeError::InlineCapacityExceeded {
                len: instructions.len(),
                capacity: MAX_INLINE_INSTRUCTIONS,
            });
        }
        let mut buffer = [Instruction::NOP; MAX_INLINE_INSTRUCTIONS];
        buffer[..instructions.len()].copy_from_slice(instructions);
        Ok(InlineProgram {
            instructions: buffer,
            len: instructions.len() as u16,
        })
    }

    /// The live instructions.
    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Opcode;

    fn sample() -> CompiledProgram {
        CompiledProgram::new(
            "fire_bolt",
            vec!["burn".to_string(), "strength".to_string()],
            vec![
                Instruction {
                    imm_f: 5.0,
                    ..Instruction::new(Opcode::ConstFloat)
                },
                Instruction {
                    src: [1, 0, 0],
                    flags: 1,
                    ..Instruction::new(Opcode::ApplyEffect)
                },
            ],
        )
    }

    #[test]
    fn encode_decode_roundtrip() {
        let program = sample();
        let decoded = CompiledProgram::decode(&program.encode()).unwrap();
        assert_eq!(program, decoded);
    }

    #[test]
    fn empty_program_roundtrip() {
        let program = CompiledProgram::new("empty", vec![], vec![]);
        let decoded = CompiledProgram::decode(&program.encode()).unwrap();
        assert_eq!(program, decoded);
        assert!(decoded.is_empty());
    }

    #[test]
    fn truncated_blob_rejected() {
        let bytes = sample().encode();
        for cut in [0, 1, 5, bytes.len() - 1] {
            let result = CompiledProgram::decode(&bytes[..cut]);
            assert!(
                matches!(result, Err(DecodeError::UnexpectedEof { .. })),
                "cut at {cut} should fail, got {result:?}"
            );
        }
    }

    #[test]
    fn invalid_symbol_utf8_rejected() {
        // graph "g", one symbol of length 2 with invalid UTF-8.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.push(b'g');
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&[0xFF, 0xFE]);
        bytes.extend_from_slice(&0u32.to_le_bytes());

        assert_eq!(
            CompiledProgram::decode(&bytes),
            Err(DecodeError::InvalidSymbol { index: 0 })
        );
    }

    #[test]
    fn inline_roundtrip() {
        let program = sample();
        let inline = InlineProgram::from_program(&program).unwrap();
        assert_eq!(inline.len(), 2);
        assert_eq!(inline.as_slice(), program.instructions.as_slice());
    }

    #[test]
    fn inline_capacity_rejected() {
        let instructions = vec![Instruction::NOP; MAX_INLINE_INSTRUCTIONS + 1];
        assert_eq!(
            InlineProgram::from_slice(&instructions),
            Err(DecodeError::InlineCapacityExceeded {
                len: MAX_INLINE_INSTRUCTIONS + 1,
                capacity: MAX_INLINE_INSTRUCTIONS,
            })
        );
    }

    #[test]
    fn inline_at_exact_capacity() {
        let instructions = vec![Instruction::NOP; MAX_INLINE_INSTRUCTIONS];
        let inline = InlineProgram::from_slice(&instructions).unwrap();
        assert_eq!(inline.len(), MAX_INLINE_INSTRUCTIONS);
    }

    #[test]
    fn inline_empty() {
        let inline = InlineProgram::from_slice(&[]).unwrap();
        assert!(inline.is_empty());
        assert!(inline.as_slice().is_empty());
    }
}
