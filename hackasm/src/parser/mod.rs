//! # Hack Assembly Parser
//!
//! Classifies each line of tokens into an A-instruction, an `(L)` label, or
//! a C-instruction `dest=comp;jump`.
//!
//! ## C-instruction reconstruction
//!
//! The lexer tokenizes the comp field at the operator level (`D`, `+`, `1`,
//! …) rather than recognizing whole mnemonics, so this module's job for a
//! C-instruction is largely textual reassembly: split the line's tokens on
//! the (optional) `=` and the (optional) `;`, validate `dest` and `jump`
//! against their fixed 8-entry tables immediately (small, closed
//! vocabularies — a bad dest/jump mnemonic is a parse-time error), and
//! concatenate whatever remains into the raw `comp` text for the encoder to
//! validate against the 28-entry comp table.

pub mod ast;

use hack_common::Span;

use crate::error::{AsmError, ErrorKind};
use crate::lexer::token::{Token, TokenKind};
use ast::{AOperand, Dest, Instruction, Jump, LineContent, SourceLine};

pub struct ParseResult {
    pub lines: Vec<SourceLine>,
    pub errors: Vec<AsmError>,
}

#[must_use]
pub fn parse_lines(tokens: &[Token]) -> ParseResult {
    let mut lines = Vec::new();
    let mut errors = Vec::new();
    let mut line_start = 0;
    let mut line_number = 1;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Newline => {
                process_line(&tokens[line_start..i], line_number, &mut lines, &mut errors);
                line_start = i + 1;
                line_number += 1;
            }
            TokenKind::Eof => {
                process_line(&tokens[line_start..i], line_number, &mut lines, &mut errors);
                break;
            }
            _ => {}
        }
    }

    ParseResult { lines, errors }
}

fn process_line(
    tokens: &[Token],
    line_number: usize,
    lines: &mut Vec<SourceLine>,
    errors: &mut Vec<AsmError>,
) {
    let span = tokens
        .first()
        .map(|t| t.span)
        .unwrap_or_else(|| Span::at_line(line_number));

    if tokens.is_empty() {
        lines.push(SourceLine {
            content: LineContent::Empty,
            line_number,
            span,
        });
        return;
    }

    match parse_content(tokens, span) {
        Ok(content) => lines.push(SourceLine {
            content,
            line_number,
            span,
        }),
        Err(err) => {
            errors.push(err);
            lines.push(SourceLine {
                content: LineContent::Empty,
                line_number,
                span,
            });
        }
    }
}

fn parse_content(tokens: &[Token], span: Span) -> Result<LineContent, AsmError> {
    match &tokens[0].kind {
        TokenKind::At => parse_a_instruction(tokens, span),
        TokenKind::LParen => parse_label(tokens, span),
        _ => parse_c_instruction(tokens, span),
    }
}

fn parse_a_instruction(tokens: &[Token], span: Span) -> Result<LineContent, AsmError> {
    if tokens.len() < 2 {
        return Err(AsmError::new(
            ErrorKind::MalformedInstruction,
            "'@' must be followed by a number or a symbol",
            span,
        ));
    }
    let operand = match &tokens[1].kind {
        TokenKind::Number(n) => AOperand::Number(*n),
        TokenKind::Word(w) => AOperand::Symbol(w.clone()),
        _ => {
            return Err(AsmError::new(
                ErrorKind::MalformedInstruction,
                "'@' must be followed by a number or a symbol",
                tokens[1].span,
            ))
        }
    };
    ensure_no_extra(tokens, 2)?;
    Ok(LineContent::Instruction(Instruction::A(operand)))
}

fn parse_label(tokens: &[Token], span: Span) -> Result<LineContent, AsmError> {
    if tokens.len() < 3 {
        return Err(AsmError::new(
            ErrorKind::MalformedInstruction,
            "expected '(LABEL)'",
            span,
        ));
    }
    let name = match &tokens[1].kind {
        TokenKind::Word(w) => w.clone(),
        _ => {
            return Err(AsmError::new(
                ErrorKind::EmptyLabel,
                "label name must be an identifier",
                tokens[1].span,
            ))
        }
    };
    if !matches!(tokens[2].kind, TokenKind::RParen) {
        return Err(AsmError::new(
            ErrorKind::MalformedInstruction,
            "expected ')' closing label",
            tokens[2].span,
        ));
    }
    ensure_no_extra(tokens, 3)?;
    Ok(LineContent::Label(name))
}

fn parse_c_instruction(tokens: &[Token], span: Span) -> Result<LineContent, AsmError> {
    let eq_idx = tokens.iter().position(|t| t.kind == TokenKind::Equals);

    let (dest, rest) = match eq_idx {
        Some(idx) => {
            if idx != 1 || !tokens[0].kind.is_word() {
                return Err(AsmError::new(
                    ErrorKind::MalformedInstruction,
                    "destination must be a single identifier before '='",
                    tokens[0].span,
                ));
            }
            let word = match &tokens[0].kind {
                TokenKind::Word(w) => w.clone(),
                _ => unreachable!(),
            };
            (parse_dest(&word, tokens[0].span)?, &tokens[idx + 1..])
        }
        None => (Dest::default(), tokens),
    };

    if rest.is_empty() {
        return Err(AsmError::new(
            ErrorKind::MalformedInstruction,
            "C-instruction is missing a comp expression",
            span,
        ));
    }

    let semi_idx = rest.iter().position(|t| t.kind == TokenKind::Semicolon);

    let (comp_tokens, jump) = match semi_idx {
        Some(idx) => {
            let jump_tokens = &rest[idx + 1..];
            if jump_tokens.len() != 1 || !jump_tokens[0].kind.is_word() {
                return Err(AsmError::new(
                    ErrorKind::MalformedInstruction,
                    "expected a single jump mnemonic after ';'",
                    rest[idx].span,
                ));
            }
            let word = match &jump_tokens[0].kind {
                TokenKind::Word(w) => w.clone(),
                _ => unreachable!(),
            };
            (&rest[..idx], parse_jump(&word, jump_tokens[0].span)?)
        }
        None => (rest, Jump::None),
    };

    if comp_tokens.is_empty() {
        return Err(AsmError::new(
            ErrorKind::MalformedInstruction,
            "C-instruction is missing a comp expression",
            span,
        ));
    }

    let comp: String = comp_tokens.iter().map(|t| t.lexeme.as_str()).collect();

    Ok(LineContent::Instruction(Instruction::C { dest, comp, jump }))
}

fn parse_dest(word: &str, span: Span) -> Result<Dest, AsmError> {
    let mut dest = Dest::default();
    for ch in word.chars() {
        match ch {
            'A' => dest.a = true,
            'D' => dest.d = true,
            'M' => dest.m = true,
            _ => {
                return Err(AsmError::new(
                    ErrorKind::UnknownDestMnemonic,
                    format!("unknown destination mnemonic '{word}'"),
                    span,
                ))
            }
        }
    }
    Ok(dest)
}

fn parse_jump(word: &str, span: Span) -> Result<Jump, AsmError> {
    match word {
        "JGT" => Ok(Jump::Jgt),
        "JEQ" => Ok(Jump::Jeq),
        "JGE" => Ok(Jump::Jge),
        "JLT" => Ok(Jump::Jlt),
        "JNE" => Ok(Jump::Jne),
        "JLE" => Ok(Jump::Jle),
        "JMP" => Ok(Jump::Jmp),
        _ => Err(AsmError::new(
            ErrorKind::UnknownJumpMnemonic,
            format!("unknown jump mnemonic '{word}'"),
            span,
        )),
    }
}

fn ensure_no_extra(tokens: &[Token], expected_len: usize) -> Result<(), AsmError> {
    if tokens.len() > expected_len {
        return Err(AsmError::new(
            ErrorKind::UnexpectedToken,
            "unexpected token after instruction",
            tokens[expected_len].span,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(src: &str) -> ParseResult {
        let lexed = tokenize(src);
        assert!(lexed.errors.is_empty(), "{:?}", lexed.errors);
        parse_lines(&lexed.tokens)
    }

    #[test]
    fn parses_a_instruction_number() {
        let result = parse("@21\n");
        assert!(result.errors.is_empty());
        assert_eq!(
            result.lines[0].content,
            LineContent::Instruction(Instruction::A(AOperand::Number(21)))
        );
    }

    #[test]
    fn parses_a_instruction_symbol() {
        let result = parse("@sum\n");
        assert_eq!(
            result.lines[0].content,
            LineContent::Instruction(Instruction::A(AOperand::Symbol("sum".into())))
        );
    }

    #[test]
    fn parses_label() {
        let result = parse("(LOOP)\n");
        assert_eq!(result.lines[0].content, LineContent::Label("LOOP".into()));
    }

    #[test]
    fn parses_full_c_instruction() {
        let result = parse("MD=D+1;JGT\n");
        match &result.lines[0].content {
            LineContent::Instruction(Instruction::C { dest, comp, jump }) => {
                assert_eq!(*dest, Dest { a: false, d: true, m: true });
                assert_eq!(comp, "D+1");
                assert_eq!(*jump, Jump::Jgt);
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[test]
    fn parses_comp_only_instruction() {
        let result = parse("0;JMP\n");
        match &result.lines[0].content {
            LineContent::Instruction(Instruction::C { dest, comp, jump }) => {
                assert_eq!(*dest, Dest::default());
                assert_eq!(comp, "0");
                assert_eq!(*jump, Jump::Jmp);
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[test]
    fn parses_dest_only_instruction() {
        let result = parse("D=M\n");
        match &result.lines[0].content {
            LineContent::Instruction(Instruction::C { dest, comp, jump }) => {
                assert_eq!(*dest, Dest { a: false, d: true, m: false });
                assert_eq!(comp, "M");
                assert_eq!(*jump, Jump::None);
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_jump_mnemonic() {
        let result = parse("0;JUNK\n");
        assert_eq!(result.errors[0].kind, ErrorKind::UnknownJumpMnemonic);
    }
}
