//! Canonical textual listing of a compiled program.
//!
//! One instruction per line, flat text, no indentation. Authoring tools
//! show this next to validator output; nothing parses it back, because
//! the IR — not text — is the source form.

use hexweave_common::CompiledProgram;
use std::fmt::Write;

/// Render a compiled program as its canonical listing.
pub fn listing(program: &CompiledProgram) -> String {
    let mut out = String::new();

    writeln!(out, "graph {}", program.graph).expect("string write");
    for (index, symbol) in program.symbols.iter().enumerate() {
        writeln!(out, "sym {index} {symbol}").expect("string write");
    }
    for (pc, instr) in program.instructions.iter().enumerate() {
        let name = match instr.opcode() {
            Some(op) => op.name(),
            None => "??",
        };
        writeln!(
            out,
            "{pc:04} {name} src={},{},{} dst={} flags={} imm_i={} imm_f={}",
            instr.src[0], instr.src[1], instr.src[2], instr.dst, instr.flags, instr.imm_i,
            instr.imm_f,
        )
        .expect("string write");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexweave_common::{Instruction, Opcode};

    #[test]
    fn canonical_lines() {
        let program = CompiledProgram::new(
            "fire_bolt",
            vec!["burn".to_string()],
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
        );
        let text = listing(&program);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "graph fire_bolt",
                "sym 0 burn",
                "0000 ConstFloat src=0,0,0 dst=0 flags=0 imm_i=0 imm_f=5",
                "0001 ApplyEffect src=1,0,0 dst=0 flags=1 imm_i=0 imm_f=0",
            ]
        );
    }

    #[test]
    fn unknown_opcode_renders_as_placeholder() {
        let mut instr = Instruction::NOP;
        instr.op = 0x4F;
        let program = CompiledProgram::new("g", vec![], vec![instr]);
        assert!(listing(&program).contains("0000 ?? "));
    }

    #[test]
    fn empty_program_lists_header_only() {
        let program = CompiledProgram::new("g", vec![], vec![]);
        assert_eq!(listing(&program), "graph g\n");
    }
}
