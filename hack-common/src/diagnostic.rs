//! Shared diagnostic rendering.
//!
//! Each stage defines its own error enum with its own variants (an
//! assembler's "unknown mnemonic" has nothing in common with a Jack
//! compiler's "undefined symbol"), but all three render the same way,
//! matching the teacher's `AsmError` `Display` impl:
//! `"ERROR (line L:C): message"`. [`Category`] is the five-way taxonomy
//! every stage's error kind maps down to for that rendering.

use crate::span::Span;

/// The error taxonomy shared across all three stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Io,
    Lex,
    Syntax,
    Semantic,
    Encode,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Io => "IoError",
            Category::Lex => "LexError",
            Category::Syntax => "SyntaxError",
            Category::Semantic => "SemanticError",
            Category::Encode => "EncodeError",
        };
        f.write_str(s)
    }
}

/// A rendered diagnostic: category, message, and source position.
///
/// Stage error enums are not required to use this directly (each keeps its
/// own `Display` impl so error messages can reference stage-specific
/// context), but each provides a `fn diagnostic(&self) -> Diagnostic` for
/// uniform reporting from `main.rs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub category: Category,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(category: Category, span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            category,
            message: message.into(),
            span,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ERROR ({}) (line {}:{}): {}",
            self.category, self.span.line, self.span.col, self.message
        )
    }
}
