//! # Jack Compiler
//!
//! Compiles Jack source (`.jack`) into Hack VM code (`.vm`), one output
//! file per input class — unlike the VM translator, which merges every
//! input into a single `.asm` file, Jack compilation keeps a 1:1
//! class-to-file mapping because each `.vm` file still names its own
//! class in every `function` line.
//!
//! ## Pipeline
//!
//! 1. **Tokenizer** (`tokenizer`) — lexes Jack source into a flat token
//!    stream, skipping comments and whitespace inline.
//! 2. **Compilation engine** (`compiler`) — a single-pass recursive-descent
//!    parser that emits VM text directly, using `symbol_table::SymbolTable`
//!    to resolve every identifier to a segment and index as it goes.

pub mod compiler;
pub mod error;
pub mod symbol_table;
pub mod tokenizer;

use std::path::{Path, PathBuf};

use error::JackError;

/// Compiles `input` (a single `.jack` file or a directory of `.jack`
/// files) and returns the paths of every `.vm` file written. A directory
/// yields one `.vm` per `.jack` file found directly inside it.
pub fn compile(input: &Path) -> Result<Vec<PathBuf>, Vec<JackError>> {
    if input.is_dir() {
        compile_directory(input)
    } else {
        compile_file(input).map(|path| vec![path])
    }
}

fn compile_file(input: &Path) -> Result<PathBuf, Vec<JackError>> {
    let source = std::fs::read_to_string(input)
        .map_err(|e| vec![JackError::io(format!("failed to read {}: {e}", input.display()))])?;

    let tokenized = tokenizer::tokenize(&source);
    if !tokenized.errors.is_empty() {
        return Err(tokenized.errors);
    }

    let result = compiler::compile_class(&tokenized.tokens);
    if !result.errors.is_empty() {
        return Err(result.errors);
    }

    let output_path = input.with_extension("vm");
    std::fs::write(&output_path, &result.vm_text)
        .map_err(|e| vec![JackError::io(format!("failed to write {}: {e}", output_path.display()))])?;
    Ok(output_path)
}

fn compile_directory(dir: &Path) -> Result<Vec<PathBuf>, Vec<JackError>> {
    let mut jack_files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| vec![JackError::io(format!("failed to read {}: {e}", dir.display()))])?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("jack"))
        .collect();
    jack_files.sort();

    if jack_files.is_empty() {
        return Err(vec![JackError::io(format!(
            "no .jack files found in {}",
            dir.display()
        ))]);
    }

    let mut outputs = Vec::with_capacity(jack_files.len());
    for path in &jack_files {
        outputs.push(compile_file(path)?);
    }
    Ok(outputs)
}
