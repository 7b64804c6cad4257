//! Fixed-width instruction encoding for compiled ability graphs.
//!
//! Every instruction is exactly 16 bytes, encoded little-endian:
//! ```text
//! Byte 0:      opcode (u8)
//! Bytes 1-3:   source register indices src0, src1, src2
//! Byte 4:      destination register index
//! Byte 5:      flags
//! Bytes 6-7:   reserved, encoded as zero
//! Bytes 8-11:  integer immediate (i32, little-endian)
//! Bytes 12-15: float immediate (f32 bits, little-endian)
//! ```
//!
//! The opcode travels as a raw byte, not as [`Opcode`](crate::Opcode):
//! enforcement of the catalog happens at dispatch time, where an
//! unregistered value is a fatal condition rather than a decode failure.

use crate::error::DecodeError;
use crate::opcode::Opcode;

/// A single 16-byte VM instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instruction {
    /// Operation, as a raw dispatch-table index.
    pub op: u8,
    /// Source register indices. Which banks they address depends on the
    /// opcode's declared operand classes.
    pub src: [u8; 3],
    /// Destination register index, in the opcode's output bank.
    pub dst: u8,
    /// Per-opcode packed extras, e.g. the wired argument count of the
    /// effect-application family.
    pub flags: u8,
    /// Integer immediate: jump offset, symbol index, limit, mask, or a
    /// second float dimension as raw bits.
    pub imm_i: i32,
    /// Float immediate: literal constant, radius, or length.
    pub imm_f: f32,
}

impl Instruction {
    /// The no-op instruction: all fields zero.
    pub const NOP: Instruction = Instruction {
        op: 0,
        src: [0; 3],
        dst: 0,
        flags: 0,
        imm_i: 0,
        imm_f: 0.0,
    };

    /// A zeroed instruction for the given opcode.
    pub fn new(op: Opcode) -> Self {
        Instruction {
            op: op as u8,
            ..Instruction::NOP
        }
    }

    /// Resolve the raw opcode byte against the catalog.
    ///
    /// Compiled programs only ever carry defined opcodes; this exists for
    /// listings and tooling over untrusted blobs.
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::try_from(self.op).ok()
    }

    /// Encode this instruction to 16 bytes (little-endian).
    pub fn encode(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[0] = self.op;
        bytes[1..4].copy_from_slice(&self.src);
        bytes[4] = self.dst;
        bytes[5] = self.flags;
        bytes[8..12].copy_from_slice(&self.imm_i.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.imm_f.to_le_bytes());
        bytes
    }

    /// Decode 16 bytes into an instruction (little-endian).
    pub fn decode(bytes: [u8; 16]) -> Self {
        Instruction {
            op: bytes[0],
            src: [bytes[1], bytes[2], bytes[3]],
            dst: bytes[4],
            flags: bytes[5],
            imm_i: i32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            imm_f: f32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        }
    }

    /// Decode a raw concatenation of 16-byte instructions, as used when a
    /// program's instruction section travels without its header.
    pub fn decode_stream(bytes: &[u8]) -> Result<Vec<Instruction>, DecodeError> {
        if bytes.len() % 16 != 0 {
            return Err(DecodeError::InvalidLength(bytes.len()));
        }
        Ok(bytes
            .chunks_exact(16)
            .map(|chunk| {
                Instruction::decode(chunk.try_into().expect("chunks_exact yields 16 bytes"))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nop_is_all_zero() {
        assert_eq!(Instruction::NOP.encode(), [0u8; 16]);
    }

    #[test]
    fn encode_decode_roundtrip_simple() {
        let instr = Instruction {
            imm_f: 5.0,
            dst: 3,
            ..Instruction::new(Opcode::ConstFloat)
        };
        assert_eq!(Instruction::decode(instr.encode()), instr);
    }

    #[test]
    fn encode_decode_roundtrip_all_fields() {
        let instr = Instruction {
            op: Opcode::ApplyEffect as u8,
            src: [1, 2, 3],
            dst: 4,
            flags: 2,
            imm_i: -12345,
            imm_f: 0.25,
        };
        assert_eq!(Instruction::decode(instr.encode()), instr);
    }

    #[test]
    fn encode_decode_roundtrip_all_opcodes() {
        for &opcode in &crate::opcode::ALL_OPCODES {
            let instr = Instruction::new(opcode);
            assert_eq!(
                Instruction::decode(instr.encode()),
                instr,
                "roundtrip failed for {opcode:?}"
            );
        }
    }

    #[test]
    fn little_endian_layout() {
        let instr = Instruction {
            op: Opcode::ConstInt as u8,
            src: [10, 11, 12],
            dst: 13,
            flags: 1,
            imm_i: 0x1234_5678,
            imm_f: 1.0,
        };
        let bytes = instr.encode();

        assert_eq!(bytes[0], 0x04); // ConstInt
        assert_eq!(bytes[1..4], [10, 11, 12]);
        assert_eq!(bytes[4], 13);
        assert_eq!(bytes[5], 1);
        assert_eq!(bytes[6..8], [0, 0]); // reserved
        assert_eq!(bytes[8..12], [0x78, 0x56, 0x34, 0x12]); // imm_i low-first
        assert_eq!(bytes[12..16], 1.0f32.to_le_bytes());
    }

    #[test]
    fn negative_integer_immediate() {
        let instr = Instruction {
            imm_i: -1,
            ..Instruction::new(Opcode::Jump)
        };
        let decoded = Instruction::decode(instr.encode());
        assert_eq!(decoded.imm_i, -1);
    }

    #[test]
    fn unknown_opcode_byte_survives_decode() {
        // Decode never rejects; the dispatch table is the enforcement point.
        let mut bytes = [0u8; 16];
        bytes[0] = 0x4F; // reserved
        let instr = Instruction::decode(bytes);
        assert_eq!(instr.op, 0x4F);
        assert_eq!(instr.opcode(), None);
    }

    #[test]
    fn opcode_resolution() {
        let instr = Instruction::new(Opcode::QueryCircle);
        assert_eq!(instr.opcode(), Some(Opcode::QueryCircle));
    }

    #[test]
    fn decode_stream_roundtrip() {
        let instructions = vec![
            Instruction {
                imm_f: 1.5,
                ..Instruction::new(Opcode::ConstFloat)
            },
            Instruction::NOP,
            Instruction {
                imm_i: -4,
                ..Instruction::new(Opcode::Jump)
            },
        ];
        let mut bytes = Vec::new();
        for instr in &instructions {
            bytes.extend_from_slice(&instr.encode());
        }
        assert_eq!(Instruction::decode_stream(&bytes).unwrap(), instructions);
    }

    #[test]
    fn decode_stream_rejects_ragged_length() {
        assert_eq!(
            Instruction::decode_stream(&[0u8; 17]),
            Err(DecodeError::InvalidLength(17))
        );
    }

    #[test]
    fn decode_stream_empty() {
        assert_eq!(Instruction::decode_stream(&[]).unwrap(), vec![]);
    }
}
