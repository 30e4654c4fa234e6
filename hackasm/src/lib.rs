//! # Hack Assembler
//!
//! A complete two-pass assembler for the Hack platform (the 16-bit computer
//! built across the Nand2Tetris course).
//!
//! ## Pipeline
//!
//! The assembler processes Hack assembly source through four stages:
//!
//! 1. **Lexer** - tokenizes source text into a token stream
//! 2. **Parser** - classifies each line into an A/L/C instruction AST
//! 3. **First pass** - walks the AST once, binding every label to its ROM address
//! 4. **Encoder** - walks the AST again, resolving variables lazily and emitting
//!    16-bit machine words
//!
//! ## Example
//!
//! ```rust,no_run
//! use hackasm::assemble;
//! use std::path::Path;
//!
//! match assemble(Path::new("program.asm")) {
//!     Ok(output_path) => println!("wrote {}", output_path.display()),
//!     Err(errors) => {
//!         for e in errors {
//!             eprintln!("{e}");
//!         }
//!     }
//! }
//! ```

pub mod encoder;
pub mod error;
pub mod first_pass;
pub mod lexer;
pub mod parser;
pub mod symbol_table;

use std::path::{Path, PathBuf};

use error::AsmError;
use lexer::tokenize;
use parser::parse_lines;

/// Assemble a single `.asm` file, writing the resulting `.hack` file next to
/// it. Returns the output path on success, or every diagnostic collected
/// across all four stages on failure.
///
/// No partial output is ever written: the `.hack` file is built up in memory
/// and written in a single `fs::write` call, only once every stage has
/// succeeded.
pub fn assemble(input_path: &Path) -> Result<PathBuf, Vec<AsmError>> {
    let source = std::fs::read_to_string(input_path).map_err(|e| {
        vec![AsmError::io(format!(
            "failed to read {}: {e}",
            input_path.display()
        ))]
    })?;

    let lexed = tokenize(&source);
    if !lexed.errors.is_empty() {
        return Err(lexed.errors);
    }

    let parsed = parse_lines(&lexed.tokens);
    if !parsed.errors.is_empty() {
        return Err(parsed.errors);
    }

    let first = first_pass::first_pass(parsed.lines);
    if !first.errors.is_empty() {
        return Err(first.errors);
    }

    let encoded = encoder::encode(first);
    if !encoded.errors.is_empty() {
        return Err(encoded.errors);
    }

    let output_path = input_path.with_extension("hack");
    let mut text = String::with_capacity(encoded.machine_code.len() * 17);
    for word in &encoded.machine_code {
        text.push_str(&format!("{word:016b}\n"));
    }

    std::fs::write(&output_path, text).map_err(|e| {
        vec![AsmError::io(format!(
            "failed to write {}: {e}",
            output_path.display()
        ))]
    })?;

    Ok(output_path)
}
