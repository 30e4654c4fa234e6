use std::fs;
use std::path::{Path, PathBuf};

use jackc::compile;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("jackc-test-{name}"));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// S5: `Point`'s constructor allocates two fields and binds them from the
/// constructor's two arguments; `getX` binds `this` then returns the field.
#[test]
fn s5_point_constructor_and_accessor() {
    let dir = scratch_dir("point");
    let jack_path = dir.join("Point.jack");
    fs::copy("tests/fixtures/Point.jack", &jack_path).unwrap();

    let outputs = compile(&jack_path).expect("compile should succeed");
    assert_eq!(outputs.len(), 1);
    let vm = fs::read_to_string(&outputs[0]).unwrap();

    let expected_new = [
        "function Point.new 0",
        "push constant 2",
        "call Memory.alloc 1",
        "pop pointer 0",
        "push argument 0",
        "pop this 0",
        "push argument 1",
        "pop this 1",
        "push pointer 0",
        "return",
    ];
    let lines: Vec<&str> = vm.lines().collect();
    let start = lines.iter().position(|l| *l == "function Point.new 0").unwrap();
    assert_eq!(&lines[start..start + expected_new.len()], expected_new);

    let expected_get_x = [
        "function Point.getX 0",
        "push argument 0",
        "pop pointer 0",
        "push this 0",
        "return",
    ];
    let start = lines.iter().position(|l| *l == "function Point.getX 0").unwrap();
    assert_eq!(&lines[start..start + expected_get_x.len()], expected_get_x);

    let _ = fs::remove_dir_all(&dir);
}

/// S6: the string literal `"Hi"` lowers to `String.new` plus one
/// `String.appendChar` call per character, each pushing its char code.
#[test]
fn s6_string_literal_lowers_to_new_and_append_char() {
    let dir = scratch_dir("strings");
    let jack_path = dir.join("Strings.jack");
    fs::copy("tests/fixtures/Strings.jack", &jack_path).unwrap();

    let outputs = compile(&jack_path).expect("compile should succeed");
    let vm = fs::read_to_string(&outputs[0]).unwrap();

    let expected = [
        "push constant 2",
        "call String.new 1",
        "push constant 72",
        "call String.appendChar 2",
        "push constant 105",
        "call String.appendChar 2",
    ];
    let lines: Vec<&str> = vm.lines().collect();
    let start = lines.iter().position(|l| *l == "push constant 2").unwrap();
    assert_eq!(&lines[start..start + expected.len()], expected);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn array_indexing_and_control_flow_compile_without_errors() {
    let dir = scratch_dir("arr");
    let jack_path = dir.join("Arr.jack");
    fs::copy("tests/fixtures/Arr.jack", &jack_path).unwrap();

    let outputs = compile(&jack_path).expect("compile should succeed");
    let vm = fs::read_to_string(&outputs[0]).unwrap();

    assert!(vm.contains("label WHILE_EXP0"));
    assert!(vm.contains("label WHILE_END1"));
    assert!(vm.contains("pop pointer 1"));
    assert!(vm.contains("push that 0"));
    assert!(vm.contains("call Arr.run 0"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn directory_input_compiles_one_vm_file_per_class() {
    let dir = scratch_dir("directory");
    fs::copy("tests/fixtures/Point.jack", dir.join("Point.jack")).unwrap();
    fs::copy("tests/fixtures/Strings.jack", dir.join("Strings.jack")).unwrap();

    let mut outputs = compile(&dir).expect("compile should succeed");
    outputs.sort();
    let names: Vec<String> = outputs
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Point.vm", "Strings.vm"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn undefined_variable_is_reported_with_span() {
    let dir = scratch_dir("undefined");
    let jack_path = dir.join("Bad.jack");
    fs::write(
        &jack_path,
        "class Bad {\n    function void run() {\n        let q = 1;\n        return;\n    }\n}\n",
    )
    .unwrap();

    let errors = compile(&jack_path).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].span.line, 3);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn compile_nonexistent_path_is_an_io_error() {
    let missing = Path::new("/nonexistent/path/to/nowhere.jack");
    let errors = compile(missing).unwrap_err();
    assert_eq!(errors.len(), 1);
}
