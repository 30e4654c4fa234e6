//! Jack compiler error taxonomy, grounded in `hackasm::error::AsmError`'s
//! shape, extended with a `Semantic` category for the symbol-table and
//! type errors the distilled spec calls out in §7 (duplicate definitions,
//! undefined symbols, `void` used in a value position) that the assembler
//! and VM translator have no equivalent of.

use hack_common::{Category, Diagnostic, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct JackError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    Io,
    UnterminatedString,
    UnknownCharacter,
    IntOutOfRange,
    UnexpectedToken,
    DuplicateSymbol,
    UndefinedSymbol,
    VoidInValuePosition,
}

impl ErrorKind {
    fn category(&self) -> Category {
        match self {
            ErrorKind::Io => Category::Io,
            ErrorKind::UnterminatedString | ErrorKind::UnknownCharacter | ErrorKind::IntOutOfRange => {
                Category::Lex
            }
            ErrorKind::UnexpectedToken => Category::Syntax,
            ErrorKind::DuplicateSymbol
            | ErrorKind::UndefinedSymbol
            | ErrorKind::VoidInValuePosition => Category::Semantic,
        }
    }
}

impl JackError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        JackError {
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        JackError::new(ErrorKind::Io, message, Span::at_line(0))
    }

    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.kind.category(), self.span, self.message.clone())
    }
}

impl std::fmt::Display for JackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.diagnostic())
    }
}
