//! # Encoder — pass 2
//!
//! Walks the parsed instruction list a second time, this time emitting one
//! 16-bit machine word per A/C instruction. Variable symbols are resolved
//! lazily here: the first time an A-instruction references a symbol with no
//! binding in the table (neither predefined nor a label from pass 1), it is
//! allocated the next free RAM address starting at 16.
//!
//! The comp mnemonic table only needs the 18 A-form entries. An M-form
//! mnemonic (`M`, `M+1`, `D+M`, …) is recognized by the textual presence of
//! `M`; its bit pattern is the same as the corresponding A-form mnemonic
//! (with `M` replaced by `A`), just with the `a` bit set to 1, exactly as
//! §4.1 describes.

use hack_common::Span;

use crate::error::{AsmError, ErrorKind};
use crate::first_pass::FirstPassResult;
use crate::parser::ast::{AOperand, Dest, Instruction, Jump, LineContent, SourceLine};
use crate::symbol_table::SymbolTable;

pub struct EncodeResult {
    pub machine_code: Vec<u16>,
    pub errors: Vec<AsmError>,
}

/// The 18 A-form comp mnemonics and their 6-bit patterns (the `a` bit is
/// not part of this table; it is 0 for these entries and 1 for their
/// `M`-substituted counterparts).
const COMP_A_FORM: &[(&str, u8)] = &[
    ("0", 0b101010),
    ("1", 0b111111),
    ("-1", 0b111010),
    ("D", 0b001100),
    ("A", 0b110000),
    ("!D", 0b001101),
    ("!A", 0b110001),
    ("-D", 0b001111),
    ("-A", 0b110011),
    ("D+1", 0b011111),
    ("A+1", 0b110111),
    ("D-1", 0b001110),
    ("A-1", 0b110010),
    ("D+A", 0b000010),
    ("D-A", 0b010011),
    ("A-D", 0b000111),
    ("D&A", 0b000000),
    ("D|A", 0b010101),
];

#[must_use]
pub fn encode(first: FirstPassResult) -> EncodeResult {
    let FirstPassResult {
        mut symbol_table,
        source_lines,
        errors: _,
    } = first;

    let mut encoder = Encoder {
        symbol_table: &mut symbol_table,
        next_variable: 16,
        machine_code: Vec::new(),
        errors: Vec::new(),
    };

    for line in &source_lines {
        encoder.encode_line(line);
    }

    EncodeResult {
        machine_code: encoder.machine_code,
        errors: encoder.errors,
    }
}

struct Encoder<'a> {
    symbol_table: &'a mut SymbolTable,
    next_variable: u16,
    machine_code: Vec<u16>,
    errors: Vec<AsmError>,
}

impl Encoder<'_> {
    fn encode_line(&mut self, line: &SourceLine) {
        match &line.content {
            LineContent::Empty | LineContent::Label(_) => {}
            LineContent::Instruction(Instruction::A(operand)) => {
                let address = self.resolve_a_operand(operand);
                self.machine_code.push(address);
            }
            LineContent::Instruction(Instruction::C { dest, comp, jump }) => {
                self.encode_c_instruction(dest, comp, *jump, line.span);
            }
        }
    }

    fn resolve_a_operand(&mut self, operand: &AOperand) -> u16 {
        match operand {
            AOperand::Number(n) => *n,
            AOperand::Symbol(name) => {
                if let Some(address) = self.symbol_table.get(name) {
                    address
                } else {
                    let address = self.next_variable;
                    self.symbol_table.insert(name.clone(), address);
                    self.next_variable += 1;
                    address
                }
            }
        }
    }

    fn encode_c_instruction(&mut self, dest: &Dest, comp: &str, jump: Jump, span: Span) {
        let comp_bits = match encode_comp(comp) {
            Ok(bits) => bits,
            Err(()) => {
                self.errors.push(AsmError::new(
                    ErrorKind::UnknownCompMnemonic,
                    format!("unknown comp mnemonic '{comp}'"),
                    span,
                ));
                0
            }
        };

        let dest_bits = encode_dest(dest);
        let jump_bits = encode_jump(jump);

        let word = (0b111u16 << 13)
            | (u16::from(comp_bits) << 6)
            | (u16::from(dest_bits) << 3)
            | u16::from(jump_bits);
        self.machine_code.push(word);
    }
}

/// Encode a comp mnemonic to its 7-bit field (`a` in bit 6, `c1..c6` in
/// bits 5..0).
fn encode_comp(mnemonic: &str) -> Result<u8, ()> {
    let has_m = mnemonic.contains('M');
    let a_form = if has_m {
        mnemonic.replace('M', "A")
    } else {
        mnemonic.to_string()
    };

    let bits6 = COMP_A_FORM
        .iter()
        .find(|(m, _)| *m == a_form)
        .map(|(_, bits)| *bits)
        .ok_or(())?;

    let a_bit = if has_m { 1u8 } else { 0u8 };
    Ok((a_bit << 6) | bits6)
}

fn encode_dest(dest: &Dest) -> u8 {
    ((dest.a as u8) << 2) | ((dest.d as u8) << 1) | (dest.m as u8)
}

fn encode_jump(jump: Jump) -> u8 {
    match jump {
        Jump::None => 0b000,
        Jump::Jgt => 0b001,
        Jump::Jeq => 0b010,
        Jump::Jge => 0b011,
        Jump::Jlt => 0b100,
        Jump::Jne => 0b101,
        Jump::Jle => 0b110,
        Jump::Jmp => 0b111,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::first_pass::first_pass;
    use crate::lexer::tokenize;
    use crate::parser::parse_lines;

    fn run(src: &str) -> EncodeResult {
        let lexed = tokenize(src);
        assert!(lexed.errors.is_empty(), "{:?}", lexed.errors);
        let parsed = parse_lines(&lexed.tokens);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let first = first_pass(parsed.lines);
        assert!(first.errors.is_empty(), "{:?}", first.errors);
        encode(first)
    }

    #[test]
    fn comp_d_plus_a_matches_standard_table() {
        assert_eq!(encode_comp("D+A"), Ok(0b0_000010));
    }

    #[test]
    fn comp_m_form_sets_a_bit() {
        assert_eq!(encode_comp("D+M"), Ok(0b1_000010));
        assert_eq!(encode_comp("M"), Ok(0b1_110000));
    }

    #[test]
    fn comp_unknown_mnemonic_is_rejected() {
        assert_eq!(encode_comp("Q"), Err(()));
    }

    #[test]
    fn s1_scenario_emits_expected_words() {
        let result = run("@2\nD=A\n@3\nD=D+A\n@0\nM=D\n");
        assert!(result.errors.is_empty());
        assert_eq!(
            result.machine_code,
            vec![
                0b0000000000000010,
                0b1110110000010000,
                0b0000000000000011,
                0b1110000010010000,
                0b0000000000000000,
                0b1110001100001000,
            ]
        );
    }

    #[test]
    fn s2_scenario_resolves_variable_and_label() {
        let result = run("@sum\nM=0\n(LOOP)\n@sum\nD=M\n@LOOP\n0;JMP\n");
        assert!(result.errors.is_empty());
        // `sum` is the first variable encountered, so it is RAM address 16.
        assert_eq!(result.machine_code[0], 0b0000000000010000);
        // `LOOP` binds to ROM address 2 (the instruction after the label).
        assert_eq!(result.machine_code[3], 0b0000000000000010);
        assert_eq!(result.machine_code[4], 0b1110101010000111);
    }

    #[test]
    fn variables_are_allocated_in_order_of_first_appearance() {
        let result = run("@foo\n@bar\n@foo\n@baz\n");
        assert_eq!(result.machine_code, vec![16, 17, 16, 18]);
    }

    #[test]
    fn unknown_comp_mnemonic_is_reported() {
        let result = run("D=Q\n");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ErrorKind::UnknownCompMnemonic);
    }
}
