//! # VM Translator
//!
//! Translates one or more Hack VM (`.vm`) files into a single Hack
//! assembly (`.asm`) file implementing the "Standard VM Mapping" — the
//! stack arithmetic, memory-segment access, and function calling
//! convention the Hack virtual machine architecture defines.
//!
//! ## Pipeline
//!
//! 1. **Parser** — tokenizes each cleaned line into a typed [`Command`](parser::ast::Command).
//! 2. **Code writer** — a stateful emitter (`codewriter::CodeWriter`) that
//!    walks the command list and appends Hack assembly to an in-memory
//!    buffer, flushed to disk once per input.
//!
//! A single `.vm` file is translated without a bootstrap; a directory of
//! `.vm` files is translated with the global bootstrap first (`SP=256`
//! followed by `call Sys.init 0`), then each file's commands in
//! lexicographic filename order, each preceded by a `set_filename` so
//! `static` symbols and `label`/`goto`/`if-goto` targets are namespaced per
//! file.

pub mod codewriter;
pub mod error;
pub mod parser;

use std::path::{Path, PathBuf};

use codewriter::CodeWriter;
use error::VmError;

/// Translates `input` (a single `.vm` file or a directory of `.vm` files)
/// into a single co-located `.asm` file. For a directory, the output is
/// `<dir>/<dirname>.asm`; for a file, it is the file with its extension
/// replaced by `.asm`.
pub fn translate(input: &Path) -> Result<PathBuf, Vec<VmError>> {
    if input.is_dir() {
        translate_directory(input)
    } else {
        translate_file(input)
    }
}

fn translate_file(input: &Path) -> Result<PathBuf, Vec<VmError>> {
    let source = std::fs::read_to_string(input).map_err(|e| {
        vec![VmError::io(format!(
            "failed to read {}: {e}",
            input.display()
        ))]
    })?;

    let stem = file_stem(input)?;
    let mut writer = CodeWriter::new();
    writer.set_filename(&stem);
    translate_source(&mut writer, &source)?;

    let output_path = input.with_extension("asm");
    write_output(&output_path, &writer.into_output())
}

fn translate_directory(dir: &Path) -> Result<PathBuf, Vec<VmError>> {
    let mut vm_files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| vec![VmError::io(format!("failed to read {}: {e}", dir.display()))])?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("vm"))
        .collect();
    // `read_dir`'s OS-level order is unspecified; sort for a stable,
    // reproducible translation order (§5).
    vm_files.sort();

    let mut writer = CodeWriter::new();
    writer.write_init();

    for path in &vm_files {
        let source = std::fs::read_to_string(path).map_err(|e| {
            vec![VmError::io(format!(
                "failed to read {}: {e}",
                path.display()
            ))]
        })?;
        let stem = file_stem(path)?;
        writer.set_filename(&stem);
        translate_source(&mut writer, &source)?;
    }

    let dir_name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("output")
        .to_string();
    let output_path = dir.join(format!("{dir_name}.asm"));
    write_output(&output_path, &writer.into_output())
}

fn translate_source(writer: &mut CodeWriter, source: &str) -> Result<(), Vec<VmError>> {
    let parsed = parser::parse(source);
    if !parsed.errors.is_empty() {
        return Err(parsed.errors);
    }
    for (command, _span) in &parsed.commands {
        writer.write_command(command);
    }
    Ok(())
}

fn file_stem(path: &Path) -> Result<String, Vec<VmError>> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| vec![VmError::io(format!("invalid file name: {}", path.display()))])
}

fn write_output(path: &Path, text: &str) -> Result<PathBuf, Vec<VmError>> {
    std::fs::write(path, text).map_err(|e| {
        vec![VmError::io(format!(
            "failed to write {}: {e}",
            path.display()
        ))]
    })?;
    Ok(path.to_path_buf())
}
