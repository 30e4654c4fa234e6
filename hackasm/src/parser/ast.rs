//! # Abstract Syntax Tree (AST)
//!
//! A Hack assembly program is a sequence of [`SourceLine`]s, each holding an
//! [`Instruction`] (A/L/C) and its source location.
//!
//! Unlike the comp mnemonic, `dest` and `jump` are always drawn from fixed
//! 8-entry tables, so they are validated and classified eagerly at parse
//! time (`Dest`/`Jump` below); the comp mnemonic is kept as raw text and
//! validated later by the encoder, since its encoding rule (drop the `M`s,
//! look up the `A`-form, then flip the `a` bit) is itself an encode-time
//! concern, not a grammar concern.

use hack_common::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine {
    pub content: LineContent,
    pub line_number: usize,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineContent {
    Empty,
    /// `(LABEL)` — a pseudo-instruction binding a ROM address, consuming no
    /// machine word.
    Label(String),
    Instruction(Instruction),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    A(AOperand),
    C {
        dest: Dest,
        comp: String,
        jump: Jump,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AOperand {
    Number(u16),
    Symbol(String),
}

/// The three destination registers a C-instruction may write to. `null`
/// (no destination) is `Dest { a: false, d: false, m: false }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dest {
    pub a: bool,
    pub d: bool,
    pub m: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Jump {
    #[default]
    None,
    Jgt,
    Jeq,
    Jge,
    Jlt,
    Jne,
    Jle,
    Jmp,
}
