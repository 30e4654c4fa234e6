//! # Hack Assembly Lexer
//!
//! Tokenizes Hack assembly source into a stream of [`Token`](token::Token)s.
//! Comments and blank lines are stripped before tokenization
//! (`hack_common::comments::strip_comments` preserves newline positions, so
//! line numbers stay accurate); this module only ever sees code.

pub mod token;

use hack_common::Cursor;
use token::{Token, TokenKind};

use crate::error::{AsmError, ErrorKind};

pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<AsmError>,
}

#[must_use]
pub fn tokenize(source: &str) -> LexResult {
    let cleaned = hack_common::comments::strip_comments(source);
    let mut cursor = Cursor::new(&cleaned);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    while !cursor.is_at_end() {
        match lex_token(&mut cursor) {
            Ok(Some(token)) => tokens.push(token),
            Ok(None) => {}
            Err(err) => errors.push(err),
        }
    }

    let (l, c) = cursor.current_pos();
    tokens.push(Token {
        kind: TokenKind::Eof,
        lexeme: String::new(),
        span: hack_common::Span::new(l, c),
    });

    LexResult { tokens, errors }
}

fn lex_token(cursor: &mut Cursor) -> Result<Option<Token>, AsmError> {
    while matches!(cursor.peek(), Some(' ' | '\t' | '\r')) {
        cursor.advance();
    }

    if cursor.is_at_end() {
        return Ok(None);
    }

    let (sl, sc) = cursor.current_pos();
    let ch = cursor.peek().unwrap();

    let simple = |kind: TokenKind, lexeme: &str, cursor: &mut Cursor| -> Option<Token> {
        cursor.advance();
        Some(Token {
            kind,
            lexeme: lexeme.to_string(),
            span: cursor.make_span(sl, sc),
        })
    };

    match ch {
        '\n' => Ok(simple(TokenKind::Newline, "\n", cursor)),
        '@' => Ok(simple(TokenKind::At, "@", cursor)),
        '(' => Ok(simple(TokenKind::LParen, "(", cursor)),
        ')' => Ok(simple(TokenKind::RParen, ")", cursor)),
        '=' => Ok(simple(TokenKind::Equals, "=", cursor)),
        ';' => Ok(simple(TokenKind::Semicolon, ";", cursor)),
        '+' => Ok(simple(TokenKind::Plus, "+", cursor)),
        '-' => Ok(simple(TokenKind::Minus, "-", cursor)),
        '!' => Ok(simple(TokenKind::Bang, "!", cursor)),
        '&' => Ok(simple(TokenKind::Amp, "&", cursor)),
        '|' => Ok(simple(TokenKind::Pipe, "|", cursor)),
        c if c.is_ascii_digit() => lex_number(cursor, sl, sc),
        c if c.is_ascii_alphabetic() || "_.$:".contains(c) => Ok(Some(lex_word(cursor, sl, sc))),
        _ => {
            cursor.advance();
            Err(AsmError::new(
                ErrorKind::UnexpectedCharacter,
                format!("unexpected character '{ch}'"),
                cursor.make_span(sl, sc),
            ))
        }
    }
}

fn lex_number(cursor: &mut Cursor, sl: usize, sc: usize) -> Result<Option<Token>, AsmError> {
    let mut digits = String::new();
    while matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
        digits.push(cursor.advance().unwrap());
    }

    let value: u32 = digits.parse().map_err(|_| {
        AsmError::new(
            ErrorKind::InvalidNumber,
            format!("invalid numeric literal '{digits}'"),
            cursor.make_span(sl, sc),
        )
    })?;

    if value > 32767 {
        return Err(AsmError::new(
            ErrorKind::NumberOutOfRange,
            format!("numeric literal {value} exceeds the 15-bit A-instruction range (0-32767)"),
            cursor.make_span(sl, sc),
        ));
    }

    Ok(Some(Token {
        kind: TokenKind::Number(value as u16),
        lexeme: digits,
        span: cursor.make_span(sl, sc),
    }))
}

fn lex_word(cursor: &mut Cursor, sl: usize, sc: usize) -> Token {
    let mut word = String::new();
    while matches!(cursor.peek(), Some(c) if c.is_ascii_alphanumeric() || "_.$:".contains(c)) {
        word.push(cursor.advance().unwrap());
    }
    Token {
        kind: TokenKind::Word(word.clone()),
        lexeme: word,
        span: cursor.make_span(sl, sc),
    }
}
