//! # Code Writer
//!
//! Stateful Hack assembly emitter for the VM translator's "Standard VM
//! Mapping". Grounded in `other_examples/…zarko-visaurum-nand2tetris`'s
//! `codegen.rs`: rather than writing through a `Write`r trait object, the
//! writer owns a plain `String` buffer and appends to it with small
//! `write_*` methods, flushing once per input file. This keeps the emitter
//! allocation-light and lets tests assert on substrings of the buffer
//! directly instead of spinning up a file handle.

use crate::parser::ast::{ArithmeticOp, Command, Segment};

pub struct CodeWriter {
    buffer: String,
    current_file: String,
    next_id: u32,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeWriter {
    pub fn new() -> Self {
        CodeWriter {
            buffer: String::new(),
            current_file: String::new(),
            next_id: 0,
        }
    }

    pub fn into_output(self) -> String {
        self.buffer
    }

    /// Switches the file-scoped context used for `static` symbols and
    /// `label`/`goto`/`if-goto` namespacing. Does not itself emit anything.
    pub fn set_filename(&mut self, stem: &str) {
        self.current_file = stem.to_string();
    }

    /// Emits the program bootstrap: `SP=256` followed by `call Sys.init 0`.
    /// Always the first thing written when it is written at all (§4.2:
    /// emitted iff the input was a directory).
    pub fn write_init(&mut self) {
        self.line("// bootstrap");
        self.line("@256");
        self.line("D=A");
        self.line("@SP");
        self.line("M=D");
        self.write_call("Sys.init", 0);
    }

    pub fn write_command(&mut self, command: &Command) {
        match command {
            Command::Arithmetic(op) => self.write_arithmetic(*op),
            Command::Push { segment, index } => self.write_push(*segment, *index),
            Command::Pop { segment, index } => self.write_pop(*segment, *index),
            Command::Label(name) => self.write_label(name),
            Command::Goto(name) => self.write_goto(name),
            Command::IfGoto(name) => self.write_if_goto(name),
            Command::Function { name, n_locals } => self.write_function(name, *n_locals),
            Command::Call { name, n_args } => self.write_call(name, *n_args),
            Command::Return => self.write_return(),
        }
    }

    fn write_arithmetic(&mut self, op: ArithmeticOp) {
        self.line(&format!("// {}", op.mnemonic()));
        match op {
            ArithmeticOp::Neg => {
                self.line("@SP");
                self.line("A=M-1");
                self.line("M=-M");
            }
            ArithmeticOp::Not => {
                self.line("@SP");
                self.line("A=M-1");
                self.line("M=!M");
            }
            ArithmeticOp::Add => self.binary_op("M=D+M"),
            ArithmeticOp::Sub => self.binary_op("M=M-D"),
            ArithmeticOp::And => self.binary_op("M=D&M"),
            ArithmeticOp::Or => self.binary_op("M=D|M"),
            ArithmeticOp::Eq => self.comparison(op, "JEQ"),
            ArithmeticOp::Gt => self.comparison(op, "JGT"),
            ArithmeticOp::Lt => self.comparison(op, "JLT"),
        }
    }

    /// Pops `y` into `D`, then applies `compute` (e.g. `M=D+M`) against the
    /// new top of stack `x`, leaving the result at the (now one-shorter)
    /// top of stack. Operand order is "second pop is the left operand":
    /// `x op y` with `x` under `M` and `y` in `D`.
    fn binary_op(&mut self, compute: &str) {
        self.line("@SP");
        self.line("AM=M-1");
        self.line("D=M");
        self.line("A=A-1");
        self.line(compute);
    }

    fn comparison(&mut self, op: ArithmeticOp, jump: &str) {
        let id = self.fresh_id();
        let mnemonic = op.mnemonic();
        self.line("@SP");
        self.line("AM=M-1");
        self.line("D=M");
        self.line("A=A-1");
        self.line("D=M-D");
        self.line(&format!("@{mnemonic}_true_{id}"));
        self.line(&format!("D;{jump}"));
        self.line("@SP");
        self.line("A=M-1");
        self.line("M=0");
        self.line(&format!("@{mnemonic}_return_{id}"));
        self.line("0;JMP");
        self.label_line(&format!("{mnemonic}_true_{id}"));
        self.line("@SP");
        self.line("A=M-1");
        self.line("M=-1");
        self.label_line(&format!("{mnemonic}_return_{id}"));
    }

    fn write_push(&mut self, segment: Segment, index: u16) {
        self.line(&format!("// push {} {}", segment_name(segment), index));
        match segment {
            Segment::Constant => {
                self.line(&format!("@{index}"));
                self.line("D=A");
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                self.line(&format!("@{}", base_symbol(segment)));
                self.line("D=M");
                self.line(&format!("@{index}"));
                self.line("A=D+A");
                self.line("D=M");
            }
            Segment::Pointer => {
                self.line(&format!("@{}", pointer_symbol(index)));
                self.line("D=M");
            }
            Segment::Temp => {
                self.line(&format!("@{}", 5 + index));
                self.line("D=M");
            }
            Segment::Static => {
                self.line(&format!("@{}", self.static_symbol(index)));
                self.line("D=M");
            }
        }
        self.push_d();
    }

    fn write_pop(&mut self, segment: Segment, index: u16) {
        self.line(&format!("// pop {} {}", segment_name(segment), index));
        match segment {
            Segment::Constant => unreachable!("parser rejects popping 'constant'"),
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                self.line(&format!("@{}", base_symbol(segment)));
                self.line("D=M");
                self.line(&format!("@{index}"));
                self.line("D=D+A");
                self.line("@R13");
                self.line("M=D");
                self.pop_d();
                self.line("@R13");
                self.line("A=M");
                self.line("M=D");
            }
            Segment::Pointer => {
                self.pop_d();
                self.line(&format!("@{}", pointer_symbol(index)));
                self.line("M=D");
            }
            Segment::Temp => {
                self.pop_d();
                self.line(&format!("@{}", 5 + index));
                self.line("M=D");
            }
            Segment::Static => {
                self.pop_d();
                let symbol = self.static_symbol(index);
                self.line(&format!("@{symbol}"));
                self.line("M=D");
            }
        }
    }

    fn write_label(&mut self, name: &str) {
        let symbol = self.namespaced(name);
        self.label_line(&symbol);
    }

    fn write_goto(&mut self, name: &str) {
        let symbol = self.namespaced(name);
        self.line(&format!("@{symbol}"));
        self.line("0;JMP");
    }

    fn write_if_goto(&mut self, name: &str) {
        let symbol = self.namespaced(name);
        self.pop_d();
        self.line(&format!("@{symbol}"));
        self.line("D;JNE");
    }

    fn write_function(&mut self, name: &str, n_locals: u16) {
        self.line(&format!("// function {name} {n_locals}"));
        self.label_line(name);
        for _ in 0..n_locals {
            self.line("@SP");
            self.line("A=M");
            self.line("M=0");
            self.line("@SP");
            self.line("M=M+1");
        }
    }

    fn write_call(&mut self, name: &str, n_args: u16) {
        self.line(&format!("// call {name} {n_args}"));
        let id = self.fresh_id();
        let return_label = format!("{name}$ret.{id}");

        self.line(&format!("@{return_label}"));
        self.line("D=A");
        self.push_d();
        for symbol in ["LCL", "ARG", "THIS", "THAT"] {
            self.line(&format!("@{symbol}"));
            self.line("D=M");
            self.push_d();
        }
        self.line(&format!("@{}", n_args + 5));
        self.line("D=A");
        self.line("@SP");
        self.line("D=M-D");
        self.line("@ARG");
        self.line("M=D");
        self.line("@SP");
        self.line("D=M");
        self.line("@LCL");
        self.line("M=D");
        self.line(&format!("@{name}"));
        self.line("0;JMP");
        self.label_line(&return_label);
    }

    fn write_return(&mut self) {
        self.line("// return");
        self.line("@LCL");
        self.line("D=M");
        self.line("@R13");
        self.line("M=D"); // FRAME = R13
        self.line("@5");
        self.line("A=D-A");
        self.line("D=M");
        self.line("@R14");
        self.line("M=D"); // RET = R14 = *(FRAME-5)
        self.pop_d();
        self.line("@ARG");
        self.line("A=M");
        self.line("M=D"); // *ARG = pop()
        self.line("@ARG");
        self.line("D=M+1");
        self.line("@SP");
        self.line("M=D"); // SP = ARG+1
        for dest in ["THAT", "THIS", "ARG", "LCL"] {
            self.line("@R13");
            self.line("AM=M-1");
            self.line("D=M");
            self.line(&format!("@{dest}"));
            self.line("M=D");
        }
        self.line("@R14");
        self.line("A=M");
        self.line("0;JMP");
    }

    fn push_d(&mut self) {
        self.line("@SP");
        self.line("A=M");
        self.line("M=D");
        self.line("@SP");
        self.line("M=M+1");
    }

    fn pop_d(&mut self) {
        self.line("@SP");
        self.line("AM=M-1");
        self.line("D=M");
    }

    fn namespaced(&self, name: &str) -> String {
        format!("{}.{name}", self.current_file)
    }

    fn static_symbol(&self, index: u16) -> String {
        format!("{}.{index}", self.current_file)
    }

    fn fresh_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn line(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    fn label_line(&mut self, symbol: &str) {
        self.buffer.push('(');
        self.buffer.push_str(symbol);
        self.buffer.push_str(")\n");
    }
}

fn segment_name(segment: Segment) -> &'static str {
    match segment {
        Segment::Constant => "constant",
        Segment::Local => "local",
        Segment::Argument => "argument",
        Segment::This => "this",
        Segment::That => "that",
        Segment::Pointer => "pointer",
        Segment::Temp => "temp",
        Segment::Static => "static",
    }
}

fn base_symbol(segment: Segment) -> &'static str {
    match segment {
        Segment::Local => "LCL",
        Segment::Argument => "ARG",
        Segment::This => "THIS",
        Segment::That => "THAT",
        _ => unreachable!("base_symbol only called for base-pointer segments"),
    }
}

fn pointer_symbol(index: u16) -> &'static str {
    match index {
        0 => "THIS",
        1 => "THAT",
        other => unreachable!("pointer index must be 0 or 1, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::ArithmeticOp;

    #[test]
    fn push_constant_emits_literal_push() {
        let mut writer = CodeWriter::new();
        writer.write_push(Segment::Constant, 7);
        let out = writer.into_output();
        assert!(out.contains("@7"));
        assert!(out.contains("D=A"));
    }

    #[test]
    fn add_pops_two_and_pushes_sum() {
        let mut writer = CodeWriter::new();
        writer.write_arithmetic(ArithmeticOp::Add);
        let out = writer.into_output();
        assert!(out.contains("AM=M-1"));
        assert!(out.contains("M=D+M"));
    }

    #[test]
    fn eq_mints_unique_labels_per_call() {
        let mut writer = CodeWriter::new();
        writer.write_arithmetic(ArithmeticOp::Eq);
        writer.write_arithmetic(ArithmeticOp::Eq);
        let out = writer.into_output();
        assert!(out.contains("(eq_true_0)"));
        assert!(out.contains("(eq_true_1)"));
    }

    #[test]
    fn label_goto_if_goto_are_namespaced_by_file() {
        let mut writer = CodeWriter::new();
        writer.set_filename("Main");
        writer.write_label("LOOP");
        writer.write_goto("LOOP");
        let out = writer.into_output();
        assert!(out.contains("(Main.LOOP)"));
        assert!(out.contains("@Main.LOOP"));
    }

    #[test]
    fn static_segment_is_namespaced_by_file() {
        let mut writer = CodeWriter::new();
        writer.set_filename("Foo");
        writer.write_push(Segment::Static, 3);
        let out = writer.into_output();
        assert!(out.contains("@Foo.3"));
    }

    #[test]
    fn call_pushes_return_address_and_frame() {
        let mut writer = CodeWriter::new();
        writer.write_call("Main.main", 2);
        let out = writer.into_output();
        assert!(out.contains("@Main.main$ret.0"));
        assert!(out.contains("@ARG"));
        assert!(out.contains("@Main.main"));
        assert!(out.contains("(Main.main$ret.0)"));
    }

    #[test]
    fn bootstrap_sets_sp_and_calls_sys_init() {
        let mut writer = CodeWriter::new();
        writer.write_init();
        let out = writer.into_output();
        assert!(out.contains("@256"));
        assert!(out.contains("@SP"));
        assert!(out.contains("@Sys.init"));
    }
}
