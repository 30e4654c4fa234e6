//! Shared primitives for the three Hack/Jack translation stages
//! ([`hackasm`](../hackasm/index.html), [`vmtranslate`](../vmtranslate/index.html),
//! [`jackc`](../jackc/index.html)).
//!
//! Every stage keeps its own token/AST/error types — there is no shared
//! grammar between an assembly mnemonic, a VM command, and a Jack keyword —
//! but all three share the same notion of a source position ([`Span`]), the
//! same byte-oriented source cursor ([`Cursor`]), the same comment-stripping
//! rules ([`comments::strip_comments`]), and the same diagnostic category
//! taxonomy ([`Category`]).

pub mod comments;
pub mod cursor;
pub mod diagnostic;
pub mod span;

pub use cursor::Cursor;
pub use diagnostic::{Category, Diagnostic};
pub use span::Span;
