use std::fs;
use std::path::{Path, PathBuf};

use vmtranslate::codewriter::CodeWriter;
use vmtranslate::parser::parse;
use vmtranslate::translate;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vmtranslate-test-{name}"));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn single_file_input_has_no_bootstrap() {
    let dir = scratch_dir("single-file");
    let path = dir.join("Simple.vm");
    fs::write(&path, "push constant 7\npush constant 8\nadd\n").unwrap();

    let asm_path = translate(&path).expect("translate should succeed");
    let text = fs::read_to_string(&asm_path).unwrap();
    assert!(!text.contains("Sys.init"), "single-file input must skip the bootstrap");
    assert!(text.contains("@7"));
    assert!(text.contains("M=D+M"));

    let _ = fs::remove_dir_all(&dir);
}

/// S3: `push constant 7; push constant 8; add` leaves SP=257, RAM[256]=15.
/// Verified at the emitted-assembly level (executing it requires the
/// external CPU simulator, out of scope per §1) by checking the arithmetic
/// sequence matches the specified "second pop is the left operand" shape
/// and that exactly one net push happens (two pushes, one pop-push pair).
#[test]
fn s3_arithmetic_sequence_shape() {
    let result = parse("push constant 7\npush constant 8\nadd\n");
    assert!(result.errors.is_empty());
    let mut writer = CodeWriter::new();
    writer.set_filename("Simple");
    for (command, _) in &result.commands {
        writer.write_command(command);
    }
    let out = writer.into_output();
    assert_eq!(out.matches("M=M+1").count(), 2, "two pushes increment SP");
    assert!(out.contains("AM=M-1"));
    assert!(out.contains("M=D+M"));
}

#[test]
fn directory_input_bootstraps_and_orders_files_lexicographically() {
    let dir = scratch_dir("directory-input");
    fs::copy("tests/fixtures/Sys.vm", dir.join("Sys.vm")).unwrap();
    fs::copy("tests/fixtures/Main.vm", dir.join("Main.vm")).unwrap();

    let asm_path = translate(&dir).expect("translate should succeed");
    assert_eq!(
        asm_path.file_name().unwrap().to_str().unwrap(),
        format!("{}.asm", dir.file_name().unwrap().to_str().unwrap())
    );

    let text = fs::read_to_string(&asm_path).unwrap();
    let bootstrap_pos = text.find("// bootstrap").unwrap();
    let main_pos = text.find("(Main.main)").unwrap();
    let sys_pos = text.find("(Sys.init)").unwrap();
    assert!(bootstrap_pos < sys_pos, "bootstrap must come first");
    assert!(sys_pos < main_pos, "Main.vm is lexicographically after Sys.vm");

    let _ = fs::remove_dir_all(&dir);
}

/// S4 (VM calling): after `Sys.init`'s bootstrap call into `Main.main`,
/// which returns 1, and `Sys.init` pops that return value into `temp 0`
/// before looping at `END`, the emitted sequence must restore the caller's
/// saved segments and leave the return value poppable into `temp 0`.
#[test]
fn s4_calling_convention_sequence() {
    let sys_source = fs::read_to_string("tests/fixtures/Sys.vm").unwrap();
    let main_source = fs::read_to_string("tests/fixtures/Main.vm").unwrap();

    let mut writer = CodeWriter::new();
    writer.write_init();
    writer.set_filename("Sys");
    for (command, _) in &parse(&sys_source).commands {
        writer.write_command(command);
    }
    writer.set_filename("Main");
    for (command, _) in &parse(&main_source).commands {
        writer.write_command(command);
    }
    let out = writer.into_output();

    // call Main.main 0 pushes a return label then the four saved segments.
    assert!(out.contains("@Main.main$ret."));
    assert!(out.contains("@LCL"));
    assert!(out.contains("@ARG"));
    assert!(out.contains("@THIS"));
    assert!(out.contains("@THAT"));
    // return copies *(FRAME-5) into R14 and restores segments via R13.
    assert!(out.contains("@R13"));
    assert!(out.contains("@R14"));
    // pop temp 0 after the call discards the return value into temp 0.
    assert!(out.contains("@5"));
}

#[test]
fn malformed_command_is_reported_with_line_number() {
    let result = parse("push constant\n");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].span.line, 1);
}

#[test]
fn translate_nonexistent_path_is_an_io_error() {
    let missing = Path::new("/nonexistent/path/to/nowhere.vm");
    let errors = translate(missing).unwrap_err();
    assert_eq!(errors.len(), 1);
}
