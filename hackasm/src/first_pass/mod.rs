//! # First Pass — label resolution
//!
//! Walks the parsed instruction list once, assigning each `(LABEL)`
//! pseudo-instruction the ROM address of the instruction that follows it.
//! A ROM counter starts at 0 and is incremented for every A- or
//! C-instruction; an L-pseudo-instruction consumes no ROM word and does
//! not advance the counter.
//!
//! Variable symbols are *not* resolved here: Hack has no directive
//! declaring them, so a symbol is only known to be a variable once the
//! encoder sees it used as an A-instruction operand with no prior label
//! binding. That resolution is lazy and happens during encoding (pass 2).

use crate::error::AsmError;
use crate::parser::ast::{Instruction, LineContent, SourceLine};
use crate::symbol_table::SymbolTable;

pub struct FirstPassResult {
    pub symbol_table: SymbolTable,
    pub source_lines: Vec<SourceLine>,
    pub errors: Vec<AsmError>,
}

/// Takes ownership of the parsed lines so the result can store them
/// directly without cloning — the encoder needs the same `Vec<SourceLine>`
/// for pass 2, and there is no reason to keep two independent copies
/// alive.
#[must_use]
pub fn first_pass(lines: Vec<SourceLine>) -> FirstPassResult {
    let mut symbol_table = SymbolTable::new();
    let mut errors = Vec::new();
    let mut rom_address: u16 = 0;

    for line in &lines {
        match &line.content {
            LineContent::Empty => {}
            LineContent::Label(name) => {
                if let Some(existing) = symbol_table.get(name) {
                    errors.push(AsmError::duplicate_label(name, existing, line.span));
                } else {
                    symbol_table.insert(name.clone(), rom_address);
                }
            }
            LineContent::Instruction(Instruction::A(_) | Instruction::C { .. }) => {
                rom_address = rom_address.wrapping_add(1);
            }
        }
    }

    FirstPassResult {
        symbol_table,
        source_lines: lines,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse_lines;

    fn run(src: &str) -> FirstPassResult {
        let lexed = tokenize(src);
        let parsed = parse_lines(&lexed.tokens);
        first_pass(parsed.lines)
    }

    #[test]
    fn label_binds_to_next_instruction_address() {
        let result = run("@0\nD=M\n(LOOP)\n@1\nD;JGT\n");
        assert!(result.errors.is_empty());
        assert_eq!(result.symbol_table.get("LOOP"), Some(2));
    }

    #[test]
    fn label_at_start_of_program_binds_to_zero() {
        let result = run("(START)\n@0\nD=M\n");
        assert_eq!(result.symbol_table.get("START"), Some(0));
    }

    #[test]
    fn duplicate_label_is_an_error() {
        let result = run("(LOOP)\n@0\n(LOOP)\n@1\n");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, crate::error::ErrorKind::DuplicateLabel);
    }
}
