//! # VM Command Parser
//!
//! The VM language is line-at-a-time and whitespace-delimited, so unlike
//! the assembler's `Cursor`-driven lexer, this parser works directly off
//! `hack_common::comments::clean_lines` (comment/blank-line stripping is
//! identical across the assembler and the VM translator, per §2's shared
//! lexical-cleaning pass) and splits each cleaned line on ASCII whitespace.

pub mod ast;

use hack_common::comments::clean_lines;
use hack_common::Span;

use crate::error::{ErrorKind, VmError};
use ast::{ArithmeticOp, Command, Segment};

pub struct ParseResult {
    pub commands: Vec<(Command, Span)>,
    pub errors: Vec<VmError>,
}

#[must_use]
pub fn parse(source: &str) -> ParseResult {
    let mut commands = Vec::new();
    let mut errors = Vec::new();

    for line in clean_lines(source) {
        let span = Span::at_line(line.line_number);
        let tokens: Vec<&str> = line.text.split_whitespace().collect();
        match parse_command(&tokens, span) {
            Ok(command) => commands.push((command, span)),
            Err(err) => errors.push(err),
        }
    }

    ParseResult { commands, errors }
}

fn parse_command(tokens: &[&str], span: Span) -> Result<Command, VmError> {
    match tokens.first().copied() {
        None => unreachable!("clean_lines never yields an empty line"),
        Some("add") => arithmetic(tokens, span, ArithmeticOp::Add),
        Some("sub") => arithmetic(tokens, span, ArithmeticOp::Sub),
        Some("neg") => arithmetic(tokens, span, ArithmeticOp::Neg),
        Some("eq") => arithmetic(tokens, span, ArithmeticOp::Eq),
        Some("gt") => arithmetic(tokens, span, ArithmeticOp::Gt),
        Some("lt") => arithmetic(tokens, span, ArithmeticOp::Lt),
        Some("and") => arithmetic(tokens, span, ArithmeticOp::And),
        Some("or") => arithmetic(tokens, span, ArithmeticOp::Or),
        Some("not") => arithmetic(tokens, span, ArithmeticOp::Not),
        Some("push") => push_pop(tokens, span, true),
        Some("pop") => push_pop(tokens, span, false),
        Some("label") => single_name(tokens, span).map(Command::Label),
        Some("goto") => single_name(tokens, span).map(Command::Goto),
        Some("if-goto") => single_name(tokens, span).map(Command::IfGoto),
        Some("function") => function_or_call(tokens, span, true),
        Some("call") => function_or_call(tokens, span, false),
        Some("return") => {
            ensure_arity(tokens, 1, span)?;
            Ok(Command::Return)
        }
        Some(other) => Err(VmError::new(
            ErrorKind::UnknownCommand,
            format!("unknown VM command '{other}'"),
            span,
        )),
    }
}

fn arithmetic(tokens: &[&str], span: Span, op: ArithmeticOp) -> Result<Command, VmError> {
    ensure_arity(tokens, 1, span)?;
    Ok(Command::Arithmetic(op))
}

fn push_pop(tokens: &[&str], span: Span, is_push: bool) -> Result<Command, VmError> {
    ensure_arity(tokens, 3, span)?;
    let segment = parse_segment(tokens[1], span)?;
    let index = parse_index(tokens[2], span)?;
    check_segment_index(segment, index, span)?;
    if is_push {
        Ok(Command::Push { segment, index })
    } else {
        if segment == Segment::Constant {
            return Err(VmError::new(
                ErrorKind::InvalidSegment,
                "'constant' is push-only and cannot be popped",
                span,
            ));
        }
        Ok(Command::Pop { segment, index })
    }
}

/// `pointer` aliases `THIS`/`THAT` (R3/R4) and only has two valid indices;
/// `temp` aliases R5-R12 and only has eight. Any index outside those
/// ranges is a malformed command, not a value to blindly alias into
/// whatever RAM cell the arithmetic happens to land on.
fn check_segment_index(segment: Segment, index: u16, span: Span) -> Result<(), VmError> {
    match segment {
        Segment::Pointer if index > 1 => Err(VmError::new(
            ErrorKind::InvalidIndex,
            format!("'pointer' index must be 0 or 1, found {index}"),
            span,
        )),
        Segment::Temp if index > 7 => Err(VmError::new(
            ErrorKind::InvalidIndex,
            format!("'temp' index must be 0-7, found {index}"),
            span,
        )),
        _ => Ok(()),
    }
}

fn function_or_call(tokens: &[&str], span: Span, is_function: bool) -> Result<Command, VmError> {
    ensure_arity(tokens, 3, span)?;
    let name = tokens[1].to_string();
    let count = parse_index(tokens[2], span)?;
    if is_function {
        Ok(Command::Function {
            name,
            n_locals: count,
        })
    } else {
        Ok(Command::Call {
            name,
            n_args: count,
        })
    }
}

fn single_name(tokens: &[&str], span: Span) -> Result<String, VmError> {
    ensure_arity(tokens, 2, span)?;
    Ok(tokens[1].to_string())
}

fn ensure_arity(tokens: &[&str], expected: usize, span: Span) -> Result<(), VmError> {
    if tokens.len() != expected {
        return Err(VmError::new(
            ErrorKind::MalformedCommand,
            format!(
                "'{}' expects {} token(s), found {}",
                tokens[0],
                expected,
                tokens.len()
            ),
            span,
        ));
    }
    Ok(())
}

fn parse_segment(text: &str, span: Span) -> Result<Segment, VmError> {
    match text {
        "constant" => Ok(Segment::Constant),
        "local" => Ok(Segment::Local),
        "argument" => Ok(Segment::Argument),
        "this" => Ok(Segment::This),
        "that" => Ok(Segment::That),
        "pointer" => Ok(Segment::Pointer),
        "temp" => Ok(Segment::Temp),
        "static" => Ok(Segment::Static),
        other => Err(VmError::new(
            ErrorKind::InvalidSegment,
            format!("unknown memory segment '{other}'"),
            span,
        )),
    }
}

fn parse_index(text: &str, span: Span) -> Result<u16, VmError> {
    text.parse::<u16>().map_err(|_| {
        VmError::new(
            ErrorKind::InvalidIndex,
            format!("expected a non-negative integer index, found '{text}'"),
            span,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_push_constant() {
        let result = parse("push constant 7\n");
        assert!(result.errors.is_empty());
        assert_eq!(
            result.commands[0].0,
            Command::Push {
                segment: Segment::Constant,
                index: 7
            }
        );
    }

    #[test]
    fn parses_arithmetic() {
        let result = parse("add\nsub\neq\n");
        assert_eq!(result.commands.len(), 3);
        assert_eq!(result.commands[0].0, Command::Arithmetic(ArithmeticOp::Add));
    }

    #[test]
    fn parses_function_and_call() {
        let result = parse("function Main.main 2\ncall Math.multiply 2\n");
        assert_eq!(
            result.commands[0].0,
            Command::Function {
                name: "Main.main".into(),
                n_locals: 2
            }
        );
        assert_eq!(
            result.commands[1].0,
            Command::Call {
                name: "Math.multiply".into(),
                n_args: 2
            }
        );
    }

    #[test]
    fn rejects_popping_constant() {
        let result = parse("pop constant 0\n");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ErrorKind::InvalidSegment);
    }

    #[test]
    fn rejects_pointer_index_out_of_range() {
        let result = parse("push pointer 2\n");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ErrorKind::InvalidIndex);

        let result = parse("pop pointer 5\n");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ErrorKind::InvalidIndex);
    }

    #[test]
    fn rejects_temp_index_out_of_range() {
        let result = parse("push temp 9\n");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ErrorKind::InvalidIndex);
    }

    #[test]
    fn accepts_boundary_pointer_and_temp_indices() {
        let result = parse("push pointer 0\npush pointer 1\npush temp 0\npush temp 7\n");
        assert!(result.errors.is_empty(), "{:?}", result.errors);
    }

    #[test]
    fn rejects_unknown_command() {
        let result = parse("frobnicate\n");
        assert_eq!(result.errors[0].kind, ErrorKind::UnknownCommand);
    }

    #[test]
    fn strips_comments_before_parsing() {
        let result = parse("push constant 1 // comment\n");
        assert!(result.errors.is_empty());
    }
}
