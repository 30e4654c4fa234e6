//! # Jack Tokenizer
//!
//! Unlike the assembler's lexer (which runs over source already cleaned by
//! `hack_common::comments::strip_comments`), the Jack tokenizer skips
//! comments and whitespace inline over its own `Cursor`. It must, because
//! string constants can legally contain `//` (`"a // not a comment"`) and
//! because per-token spans need to stay accurate without a separate
//! line-renumbering pass — see `hack_common::comments`'s module doc for
//! why the two approaches coexist.

pub mod token;

use hack_common::Cursor;
use token::{Keyword, Token, TokenKind};

use crate::error::{ErrorKind, JackError};

const SYMBOLS: &str = "{}()[].,;+-*/&|<>=~";

pub struct TokenizeResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<JackError>,
}

#[must_use]
pub fn tokenize(source: &str) -> TokenizeResult {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    loop {
        skip_whitespace_and_comments(&mut cursor);
        if cursor.is_at_end() {
            break;
        }

        let (sl, sc) = cursor.current_pos();
        match next_token(&mut cursor, sl, sc) {
            Ok(token) => tokens.push(token),
            Err(err) => errors.push(err),
        }
    }

    TokenizeResult { tokens, errors }
}

fn skip_whitespace_and_comments(cursor: &mut Cursor) {
    loop {
        match cursor.peek() {
            Some(c) if c.is_whitespace() => {
                cursor.advance();
            }
            Some('/') if cursor.peek_at(1) == Some('/') => {
                while !cursor.is_at_end() && cursor.peek() != Some('\n') {
                    cursor.advance();
                }
            }
            Some('/') if cursor.peek_at(1) == Some('*') => {
                cursor.advance();
                cursor.advance();
                while !cursor.is_at_end()
                    && !(cursor.peek() == Some('*') && cursor.peek_at(1) == Some('/'))
                {
                    cursor.advance();
                }
                cursor.advance();
                cursor.advance();
            }
            _ => break,
        }
    }
}

fn next_token(cursor: &mut Cursor, sl: usize, sc: usize) -> Result<Token, JackError> {
    let ch = cursor.peek().unwrap();

    if ch == '"' {
        return lex_string(cursor, sl, sc);
    }
    if ch.is_ascii_digit() {
        return lex_int(cursor, sl, sc);
    }
    if ch.is_ascii_alphabetic() || ch == '_' {
        return Ok(lex_word(cursor, sl, sc));
    }
    if SYMBOLS.contains(ch) {
        cursor.advance();
        return Ok(Token {
            kind: TokenKind::Symbol(ch),
            span: cursor.make_span(sl, sc),
        });
    }

    cursor.advance();
    Err(JackError::new(
        ErrorKind::UnknownCharacter,
        format!("unexpected character '{ch}'"),
        cursor.make_span(sl, sc),
    ))
}

fn lex_string(cursor: &mut Cursor, sl: usize, sc: usize) -> Result<Token, JackError> {
    cursor.advance(); // opening quote
    let mut text = String::new();
    loop {
        match cursor.peek() {
            None | Some('\n') => {
                return Err(JackError::new(
                    ErrorKind::UnterminatedString,
                    "unterminated string constant",
                    cursor.make_span(sl, sc),
                ))
            }
            Some('"') => {
                cursor.advance();
                break;
            }
            Some(c) => {
                text.push(c);
                cursor.advance();
            }
        }
    }
    Ok(Token {
        kind: TokenKind::StringConst(text),
        span: cursor.make_span(sl, sc),
    })
}

fn lex_int(cursor: &mut Cursor, sl: usize, sc: usize) -> Result<Token, JackError> {
    let mut digits = String::new();
    while matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
        digits.push(cursor.advance().unwrap());
    }
    let value: u32 = digits.parse().expect("digit run always parses");
    if value > 32767 {
        return Err(JackError::new(
            ErrorKind::IntOutOfRange,
            format!("integer constant {value} exceeds the range 0..32767"),
            cursor.make_span(sl, sc),
        ));
    }
    Ok(Token {
        kind: TokenKind::IntConst(value as u16),
        span: cursor.make_span(sl, sc),
    })
}

fn lex_word(cursor: &mut Cursor, sl: usize, sc: usize) -> Token {
    let mut word = String::new();
    while matches!(cursor.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
        word.push(cursor.advance().unwrap());
    }
    let kind = match Keyword::from_str(&word) {
        Some(keyword) => TokenKind::Keyword(keyword),
        None => TokenKind::Identifier(word),
    };
    Token {
        kind,
        span: cursor.make_span(sl, sc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_keywords_and_identifiers() {
        let result = tokenize("class Main { }");
        assert!(result.errors.is_empty());
        assert_eq!(result.tokens[0].kind, TokenKind::Keyword(Keyword::Class));
        assert_eq!(
            result.tokens[1].kind,
            TokenKind::Identifier("Main".to_string())
        );
        assert_eq!(result.tokens[2].kind, TokenKind::Symbol('{'));
    }

    #[test]
    fn tokenizes_int_and_string_constants() {
        let result = tokenize("42 \"hello\"");
        assert_eq!(result.tokens[0].kind, TokenKind::IntConst(42));
        assert_eq!(
            result.tokens[1].kind,
            TokenKind::StringConst("hello".to_string())
        );
    }

    #[test]
    fn string_constants_may_contain_line_comment_markers() {
        let result = tokenize("\"a // not a comment\"");
        assert!(result.errors.is_empty());
        assert_eq!(
            result.tokens[0].kind,
            TokenKind::StringConst("a // not a comment".to_string())
        );
    }

    #[test]
    fn skips_line_and_block_comments() {
        let result = tokenize("// header\nlet x = 1; /* trailer\nspans lines */ let y = 2;");
        let kinds: Vec<_> = result.tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(Keyword::Let),
                TokenKind::Identifier("x".into()),
                TokenKind::Symbol('='),
                TokenKind::IntConst(1),
                TokenKind::Symbol(';'),
                TokenKind::Keyword(Keyword::Let),
                TokenKind::Identifier("y".into()),
                TokenKind::Symbol('='),
                TokenKind::IntConst(2),
                TokenKind::Symbol(';'),
            ]
        );
    }

    #[test]
    fn rejects_unterminated_string() {
        let result = tokenize("\"never closed");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ErrorKind::UnterminatedString);
    }

    #[test]
    fn rejects_out_of_range_integer() {
        let result = tokenize("40000");
        assert_eq!(result.errors[0].kind, ErrorKind::IntOutOfRange);
    }
}
