//! VM translator error taxonomy, grounded in `hackasm::error::AsmError`'s
//! shape: one flat enum of error kinds, each carrying its own message and a
//! `Span`, with a `category()` mapping down to `hack_common::Category` for
//! uniform `Display` rendering.

use hack_common::{Category, Diagnostic, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct VmError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    Io,
    UnknownCommand,
    MalformedCommand,
    InvalidSegment,
    InvalidIndex,
}

impl ErrorKind {
    fn category(&self) -> Category {
        match self {
            ErrorKind::Io => Category::Io,
            ErrorKind::UnknownCommand
            | ErrorKind::MalformedCommand
            | ErrorKind::InvalidSegment
            | ErrorKind::InvalidIndex => Category::Syntax,
        }
    }
}

impl VmError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        VmError {
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        VmError::new(ErrorKind::Io, message, Span::at_line(0))
    }

    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.kind.category(), self.span, self.message.clone())
    }
}

impl std::fmt::Display for VmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.diagnostic())
    }
}
