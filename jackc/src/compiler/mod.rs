//! # Compilation Engine
//!
//! A single-pass, recursive-descent compiler from the Jack token stream
//! straight to VM text — no persistent AST, mirroring the way
//! `vmtranslate::codewriter` builds its output directly into a `String`
//! buffer rather than through a `Write`r trait object. Grammar shape and
//! code-generation rules are grounded in `original_source/11/utils.py`
//! (the reference `CompilationEngine`), re-expressed as Rust `Result`
//! chains instead of that module's exception-driven control flow.
//!
//! Two fidelity points the distilled grammar glosses over, both resolved
//! here and recorded in the workspace's design notes:
//!
//! 1. A subroutine can call a sibling subroutine declared *later* in the
//!    same class. Resolving whether such a bare call is a method
//!    (needs an implicit `this`) or a function/constructor requires
//!    knowing every sibling's kind before compiling any one body, so
//!    [`prescan_subroutines`] runs once before the main pass.
//! 2. A bare identifier followed directly by `(` is itself a
//!    subroutine call (implicit `this`), not just identifiers followed
//!    by `.`. [`Compiler::compile_term`] checks both.

use std::collections::HashMap;

use hack_common::Span;

use crate::error::{ErrorKind, JackError};
use crate::symbol_table::{Kind, SymbolTable, VarEntry};
use crate::tokenizer::token::{Keyword, Token, TokenKind};

pub struct CompileResult {
    pub vm_text: String,
    pub errors: Vec<JackError>,
}

#[must_use]
pub fn compile_class(tokens: &[Token]) -> CompileResult {
    let mut compiler = Compiler::new(tokens);
    if let Err(err) = compiler.run() {
        compiler.errors.push(err);
    }
    CompileResult {
        vm_text: compiler.out,
        errors: compiler.errors,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubKind {
    Constructor,
    Function,
    Method,
}

struct Compiler<'a> {
    tokens: &'a [Token],
    pos: usize,
    class_name: String,
    symbols: SymbolTable,
    subroutine_kinds: HashMap<String, SubKind>,
    void_subroutines: HashMap<String, bool>,
    next_label: u32,
    out: String,
    errors: Vec<JackError>,
}

impl<'a> Compiler<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        let (subroutine_kinds, void_subroutines) = prescan_subroutines(tokens);
        Compiler {
            tokens,
            pos: 0,
            class_name: String::new(),
            symbols: SymbolTable::new(),
            subroutine_kinds,
            void_subroutines,
            next_label: 0,
            out: String::new(),
            errors: Vec::new(),
        }
    }

    // --- token stream plumbing -------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn current_span(&self) -> Span {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.span)
            .unwrap_or(Span::at_line(0))
    }

    fn unexpected(&self, expected: &str) -> JackError {
        let found = self
            .peek()
            .map(|t| t.kind.describe())
            .unwrap_or_else(|| "end of input".to_string());
        JackError::new(
            ErrorKind::UnexpectedToken,
            format!("expected {expected}, found {found}"),
            self.current_span(),
        )
    }

    fn expect_symbol(&mut self, c: char) -> Result<(), JackError> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Symbol(s)) if *s == c => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected(&format!("'{c}'"))),
        }
    }

    fn peek_symbol(&self, c: char) -> bool {
        matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Symbol(s)) if *s == c)
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<(), JackError> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Keyword(k)) if *k == kw => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected(&format!("keyword '{kw:?}'"))),
        }
    }

    fn peek_keyword(&self, kw: Keyword) -> bool {
        matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Keyword(k)) if *k == kw)
    }

    fn expect_identifier(&mut self) -> Result<String, JackError> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Identifier(name)) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    fn emit(&mut self, line: impl AsRef<str>) {
        self.out.push_str(line.as_ref());
        self.out.push('\n');
    }

    fn fresh_label(&mut self, prefix: &str) -> String {
        let id = self.next_label;
        self.next_label += 1;
        format!("{prefix}{id}")
    }

    // --- grammar -----------------------------------------------------

    fn run(&mut self) -> Result<(), JackError> {
        self.expect_keyword(Keyword::Class)?;
        self.class_name = self.expect_identifier()?;
        self.expect_symbol('{')?;

        while self.peek_keyword(Keyword::Static) || self.peek_keyword(Keyword::Field) {
            self.compile_class_var_dec()?;
        }
        while self.peek_keyword(Keyword::Constructor)
            || self.peek_keyword(Keyword::Function)
            || self.peek_keyword(Keyword::Method)
        {
            self.compile_subroutine_dec()?;
        }
        self.expect_symbol('}')?;
        Ok(())
    }

    fn compile_type(&mut self) -> Result<String, JackError> {
        match self.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::Keyword(Keyword::Int)) => {
                self.advance();
                Ok("int".to_string())
            }
            Some(TokenKind::Keyword(Keyword::Char)) => {
                self.advance();
                Ok("char".to_string())
            }
            Some(TokenKind::Keyword(Keyword::Boolean)) => {
                self.advance();
                Ok("boolean".to_string())
            }
            Some(TokenKind::Identifier(name)) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("a type")),
        }
    }

    fn compile_class_var_dec(&mut self) -> Result<(), JackError> {
        let kind = if self.peek_keyword(Keyword::Static) {
            self.advance();
            Kind::Static
        } else {
            self.expect_keyword(Keyword::Field)?;
            Kind::Field
        };
        let var_type = self.compile_type()?;
        loop {
            let name = self.expect_identifier()?;
            let span = self.current_span();
            if !self.symbols.define(&name, &var_type, kind) {
                return Err(JackError::new(
                    ErrorKind::DuplicateSymbol,
                    format!("'{name}' is already defined in this class"),
                    span,
                ));
            }
            if self.peek_symbol(',') {
                self.advance();
                continue;
            }
            break;
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    fn compile_subroutine_dec(&mut self) -> Result<(), JackError> {
        let sub_kind = if self.peek_keyword(Keyword::Constructor) {
            self.advance();
            SubKind::Constructor
        } else if self.peek_keyword(Keyword::Function) {
            self.advance();
            SubKind::Function
        } else {
            self.expect_keyword(Keyword::Method)?;
            SubKind::Method
        };

        if self.peek_keyword(Keyword::Void) {
            self.advance();
        } else {
            self.compile_type()?;
        }
        let name = self.expect_identifier()?;

        self.symbols.start_subroutine();
        if sub_kind == SubKind::Method {
            let class_name = self.class_name.clone();
            self.symbols.define("this", &class_name, Kind::Arg);
        }

        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;

        self.expect_symbol('{')?;
        while self.peek_keyword(Keyword::Var) {
            self.compile_var_dec()?;
        }
        let n_locals = self.symbols.var_count(Kind::Var);
        self.emit(format!("function {}.{} {}", self.class_name, name, n_locals));

        match sub_kind {
            SubKind::Constructor => {
                let n_fields = self.symbols.var_count(Kind::Field);
                self.emit(format!("push constant {n_fields}"));
                self.emit("call Memory.alloc 1");
                self.emit("pop pointer 0");
            }
            SubKind::Method => {
                self.emit("push argument 0");
                self.emit("pop pointer 0");
            }
            SubKind::Function => {}
        }

        self.compile_statements()?;
        self.expect_symbol('}')?;
        Ok(())
    }

    fn compile_parameter_list(&mut self) -> Result<(), JackError> {
        if self.peek_symbol(')') {
            return Ok(());
        }
        loop {
            let var_type = self.compile_type()?;
            let name = self.expect_identifier()?;
            self.symbols.define(&name, &var_type, Kind::Arg);
            if self.peek_symbol(',') {
                self.advance();
                continue;
            }
            break;
        }
        Ok(())
    }

    fn compile_var_dec(&mut self) -> Result<(), JackError> {
        self.expect_keyword(Keyword::Var)?;
        let var_type = self.compile_type()?;
        loop {
            let name = self.expect_identifier()?;
            self.symbols.define(&name, &var_type, Kind::Var);
            if self.peek_symbol(',') {
                self.advance();
                continue;
            }
            break;
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    fn compile_statements(&mut self) -> Result<(), JackError> {
        loop {
            if self.peek_keyword(Keyword::Let) {
                self.compile_let()?;
            } else if self.peek_keyword(Keyword::If) {
                self.compile_if()?;
            } else if self.peek_keyword(Keyword::While) {
                self.compile_while()?;
            } else if self.peek_keyword(Keyword::Do) {
                self.compile_do()?;
            } else if self.peek_keyword(Keyword::Return) {
                self.compile_return()?;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn compile_let(&mut self) -> Result<(), JackError> {
        self.expect_keyword(Keyword::Let)?;
        let name = self.expect_identifier()?;
        let name_span = self.current_span();

        if self.peek_symbol('[') {
            self.advance();
            let entry = self.lookup_or_error(&name, name_span)?;
            self.emit(format!("push {} {}", entry.kind.segment(), entry.index));
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.emit("add");
            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.expect_symbol(';')?;
            self.emit("pop temp 0");
            self.emit("pop pointer 1");
            self.emit("push temp 0");
            self.emit("pop that 0");
        } else {
            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.expect_symbol(';')?;
            let entry = self.lookup_or_error(&name, name_span)?;
            self.emit(format!("pop {} {}", entry.kind.segment(), entry.index));
        }
        Ok(())
    }

    fn compile_if(&mut self) -> Result<(), JackError> {
        self.expect_keyword(Keyword::If)?;
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.emit("not");
        let false_label = self.fresh_label("IF_FALSE");
        let end_label = self.fresh_label("IF_END");
        self.emit(format!("if-goto {false_label}"));
        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;
        self.emit(format!("goto {end_label}"));
        self.emit(format!("label {false_label}"));
        if self.peek_keyword(Keyword::Else) {
            self.advance();
            self.expect_symbol('{')?;
            self.compile_statements()?;
            self.expect_symbol('}')?;
        }
        self.emit(format!("label {end_label}"));
        Ok(())
    }

    fn compile_while(&mut self) -> Result<(), JackError> {
        self.expect_keyword(Keyword::While)?;
        let top_label = self.fresh_label("WHILE_EXP");
        let end_label = self.fresh_label("WHILE_END");
        self.emit(format!("label {top_label}"));
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.emit("not");
        self.emit(format!("if-goto {end_label}"));
        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;
        self.emit(format!("goto {top_label}"));
        self.emit(format!("label {end_label}"));
        Ok(())
    }

    fn compile_do(&mut self) -> Result<(), JackError> {
        self.expect_keyword(Keyword::Do)?;
        let name = self.expect_identifier()?;
        let span = self.current_span();
        self.compile_subroutine_call(name, span, false)?;
        self.expect_symbol(';')?;
        self.emit("pop temp 0");
        Ok(())
    }

    fn compile_return(&mut self) -> Result<(), JackError> {
        self.expect_keyword(Keyword::Return)?;
        if self.peek_symbol(';') {
            self.emit("push constant 0");
        } else {
            self.compile_expression()?;
        }
        self.expect_symbol(';')?;
        self.emit("return");
        Ok(())
    }

    fn compile_expression_list(&mut self) -> Result<u16, JackError> {
        if self.peek_symbol(')') {
            return Ok(0);
        }
        let mut count = 0u16;
        loop {
            self.compile_expression()?;
            count += 1;
            if self.peek_symbol(',') {
                self.advance();
                continue;
            }
            break;
        }
        Ok(count)
    }

    fn compile_expression(&mut self) -> Result<(), JackError> {
        self.compile_term()?;
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Symbol(c))
                    if matches!(c, '+' | '-' | '*' | '/' | '&' | '|' | '<' | '>' | '=') =>
                {
                    *c
                }
                _ => break,
            };
            self.advance();
            self.compile_term()?;
            match op {
                '+' => self.emit("add"),
                '-' => self.emit("sub"),
                '*' => self.emit("call Math.multiply 2"),
                '/' => self.emit("call Math.divide 2"),
                '&' => self.emit("and"),
                '|' => self.emit("or"),
                '<' => self.emit("lt"),
                '>' => self.emit("gt"),
                '=' => self.emit("eq"),
                _ => unreachable!(),
            }
        }
        Ok(())
    }

    fn compile_term(&mut self) -> Result<(), JackError> {
        match self.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::IntConst(n)) => {
                self.advance();
                self.emit(format!("push constant {n}"));
            }
            Some(TokenKind::StringConst(s)) => {
                self.advance();
                self.compile_string_literal(&s);
            }
            Some(TokenKind::Keyword(Keyword::True)) => {
                self.advance();
                self.emit("push constant 1");
                self.emit("neg");
            }
            Some(TokenKind::Keyword(Keyword::False)) | Some(TokenKind::Keyword(Keyword::Null)) => {
                self.advance();
                self.emit("push constant 0");
            }
            Some(TokenKind::Keyword(Keyword::This)) => {
                self.advance();
                self.emit("push pointer 0");
            }
            Some(TokenKind::Symbol('(')) => {
                self.advance();
                self.compile_expression()?;
                self.expect_symbol(')')?;
            }
            Some(TokenKind::Symbol('-')) => {
                self.advance();
                self.compile_term()?;
                self.emit("neg");
            }
            Some(TokenKind::Symbol('~')) => {
                self.advance();
                self.compile_term()?;
                self.emit("not");
            }
            Some(TokenKind::Identifier(name)) => {
                let span = self.current_span();
                self.advance();
                if self.peek_symbol('[') {
                    self.advance();
                    let entry = self.lookup_or_error(&name, span)?;
                    self.emit(format!("push {} {}", entry.kind.segment(), entry.index));
                    self.compile_expression()?;
                    self.expect_symbol(']')?;
                    self.emit("add");
                    self.emit("pop pointer 1");
                    self.emit("push that 0");
                } else if self.peek_symbol('.') || self.peek_symbol('(') {
                    self.compile_subroutine_call(name, span, true)?;
                } else {
                    let entry = self.lookup_or_error(&name, span)?;
                    self.emit(format!("push {} {}", entry.kind.segment(), entry.index));
                }
            }
            _ => return Err(self.unexpected("a term")),
        }
        Ok(())
    }

    fn compile_string_literal(&mut self, text: &str) {
        self.emit(format!("push constant {}", text.chars().count()));
        self.emit("call String.new 1");
        for c in text.chars() {
            self.emit(format!("push constant {}", c as u32));
            self.emit("call String.appendChar 2");
        }
    }

    /// `first_name` has already been consumed; the next token is `.` or `(`.
    /// `in_value_position` is true when the call result is used by an
    /// enclosing expression (as opposed to a `do` statement, which discards
    /// it) — only then can calling a `void` subroutine be a semantic error.
    fn compile_subroutine_call(
        &mut self,
        first_name: String,
        first_span: Span,
        in_value_position: bool,
    ) -> Result<(), JackError> {
        if self.peek_symbol('.') {
            self.advance();
            let sub_name = self.expect_identifier()?;
            self.expect_symbol('(')?;
            if let Some(entry) = self.symbols.lookup(&first_name).cloned() {
                self.emit(format!("push {} {}", entry.kind.segment(), entry.index));
                let n = self.compile_expression_list()?;
                self.expect_symbol(')')?;
                self.emit(format!("call {}.{} {}", entry.var_type, sub_name, n + 1));
            } else {
                let n = self.compile_expression_list()?;
                self.expect_symbol(')')?;
                self.emit(format!("call {}.{} {}", first_name, sub_name, n));
                if first_name == self.class_name && in_value_position {
                    self.check_not_void(&sub_name, first_span)?;
                }
            }
            Ok(())
        } else if self.peek_symbol('(') {
            self.advance();
            // A bare call always targets the current class; only a method
            // needs the implicit `this` pushed ahead of its arguments (a
            // function or constructor declared in the same class is called
            // verbatim, per rule 11's third bullet).
            let is_method = matches!(self.subroutine_kinds.get(&first_name), Some(SubKind::Method));
            if is_method {
                self.emit("push pointer 0");
            }
            let n = self.compile_expression_list()?;
            self.expect_symbol(')')?;
            let n_args = if is_method { n + 1 } else { n };
            self.emit(format!("call {}.{} {}", self.class_name, first_name, n_args));
            if in_value_position {
                self.check_not_void(&first_name, first_span)?;
            }
            Ok(())
        } else {
            Err(self.unexpected("'.' or '(' to complete a subroutine call"))
        }
    }

    /// Same-class calls are the only ones whose return type the single-pass
    /// compiler knows ahead of time (via [`prescan_subroutines`]); a
    /// cross-class `void` call used as a value is left to run-time/VM-level
    /// misbehavior, same as the reference Jack toolchain.
    fn check_not_void(&mut self, sub_name: &str, span: Span) -> Result<(), JackError> {
        if self.void_subroutines.get(sub_name).copied().unwrap_or(false) {
            return Err(JackError::new(
                ErrorKind::VoidInValuePosition,
                format!("'{sub_name}' returns void and cannot be used in an expression"),
                span,
            ));
        }
        Ok(())
    }

    fn lookup_or_error(&mut self, name: &str, span: Span) -> Result<VarEntry, JackError> {
        self.symbols.lookup(name).cloned().ok_or_else(|| {
            JackError::new(
                ErrorKind::UndefinedSymbol,
                format!("'{name}' is not defined"),
                span,
            )
        })
    }
}

/// Scans every `(constructor|function|method) (<type>|void) <name> (` header
/// in the class body so sibling subroutines can resolve each other's kind
/// and return type before any one body is compiled. Jack subroutine
/// declarations never nest, so a flat scan (no brace-depth tracking) is
/// sufficient.
fn prescan_subroutines(tokens: &[Token]) -> (HashMap<String, SubKind>, HashMap<String, bool>) {
    let mut kinds = HashMap::new();
    let mut is_void = HashMap::new();
    let mut i = 0;
    while i < tokens.len() {
        let kind = match &tokens[i].kind {
            TokenKind::Keyword(Keyword::Constructor) => Some(SubKind::Constructor),
            TokenKind::Keyword(Keyword::Function) => Some(SubKind::Function),
            TokenKind::Keyword(Keyword::Method) => Some(SubKind::Method),
            _ => None,
        };
        if let Some(kind) = kind {
            let returns_void = matches!(
                tokens.get(i + 1).map(|t| &t.kind),
                Some(TokenKind::Keyword(Keyword::Void))
            );
            if let Some(name_tok) = tokens.get(i + 2) {
                if let TokenKind::Identifier(name) = &name_tok.kind {
                    kinds.insert(name.clone(), kind);
                    is_void.insert(name.clone(), returns_void);
                }
            }
        }
        i += 1;
    }
    (kinds, is_void)
}
