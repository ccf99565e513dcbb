use std::path::{Path, PathBuf};
use std::process::Command;

use tforth::{CodeManagement, ErrorKind, ForthInterpreter, InterpreterOutput, InterpreterStack};

// Helper to get absolute path from manifest dir
fn manifest_path(rel: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir).join(rel)
}

fn script_path(name: &str) -> String {
    manifest_path("tests/scripts").join(name).to_string_lossy().into_owned()
}

// Helper to run the interpreter binary with a script and capture its output and exit status.
fn run_script(name: &str) -> (String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_tforth"))
        .arg(script_path(name))
        .env("TFORTH_MEMORY_LIMIT", "1024")
        .output()
        .expect("Failed to run interpreter");

    (String::from_utf8_lossy(&output.stdout).to_string(), output.status.success())
}

fn assert_00_test_words_output(output: &str) {
    assert!(output.contains("Hello world!"), "Missing 'Hello world!' in output");
    assert!(
        output.contains("The 10 is greater than 0!"),
        "Missing 'The 10 is greater than 0!' in output"
    );
    assert!(
        output.contains("What about failed ifs?"),
        "Missing 'What about failed ifs?' in output"
    );
    assert!(output.contains("Total: 7"), "Missing 'Total: 7' in output");
    assert!(output.contains("Week: 7"), "Missing 'Week: 7' in output");
    assert!(output.contains("Goodbye all."), "Missing 'Goodbye all.' in output");
    assert!(output.contains("All done."), "Missing 'All done.' in output");
    assert!(output.contains("Depth: 0"), "Missing 'Depth: 0' in output");
}

fn assert_01_test_loops_output(output: &str) {
    for n in (0..=9).rev() {
        let line = format!("Looping until: {}", n);
        assert!(output.contains(&line), "Missing '{}'", line);
    }
    for n in (0..=9).rev() {
        let line = format!("Looping while: {}", n);
        assert!(output.contains(&line), "Missing '{}'", line);
    }
    let looping_count = output.matches("Looping.").count();
    assert_eq!(looping_count, 10, "Expected 10 'Looping.' lines, got {}", looping_count);
    assert!(output.contains("1 2 \n2 4 \n"), "Missing the multiplication table");
}

#[test]
fn test_00_test_words() {
    let (output, success) = run_script("00_test_words.f");
    println!("\n--- Output of 00_test_words.f ---\n{}\n-------------------------------", output);
    assert!(success);
    assert_00_test_words_output(&output);
}

#[test]
fn test_01_test_loops() {
    let (output, success) = run_script("01_test_loops.f");
    println!("\n--- Output of 01_test_loops.f ---\n{}\n-------------------------------", output);
    assert!(success);
    assert_01_test_loops_output(&output);
}

#[test]
fn test_02_test_failure() {
    let (output, success) = run_script("02_test_failure.f");
    assert!(!success, "A failing script should exit with an error status");
    assert!(output.contains("Before the failure."));
    assert!(!output.contains("Never printed."));
}

#[test]
fn test_00_test_words_lib() {
    let mut interpreter = ForthInterpreter::new();
    let result = interpreter.process_source_file(&script_path("00_test_words.f"));
    assert!(result.is_ok(), "Script failed: {:?}", result.as_ref().err());
    let evaluation = result.unwrap();
    assert_00_test_words_output(&evaluation.output);
    assert!(evaluation.stack.is_empty());
}

#[test]
fn test_01_test_loops_lib() {
    let mut interpreter = ForthInterpreter::new();
    let result = interpreter.process_source_file(&script_path("01_test_loops.f"));
    assert!(result.is_ok(), "Script failed: {:?}", result.as_ref().err());
    assert_01_test_loops_output(&result.unwrap().output);
}

#[test]
fn test_02_test_failure_lib() {
    let mut interpreter = ForthInterpreter::new();
    let error = interpreter.process_source_file(&script_path("02_test_failure.f")).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::DivisionByZero);
    assert_eq!(error.location().as_ref().map(|location| location.line()), Some(4));
    // The output written before the error is kept until the next evaluation.
    assert_eq!(interpreter.output(), "Before the failure.\n");
    assert_eq!(interpreter.stack().as_slice(), &[1, 0]);
}

#[test]
fn test_missing_script() {
    let mut interpreter = ForthInterpreter::new();
    let error = interpreter.process_source_file(&script_path("no_such_script.f")).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Tokenize);
}

#[test]
fn test_03_invalid_utf8_lib() {
    let mut interpreter = ForthInterpreter::new();
    let error = interpreter.process_source_file(&script_path("03_invalid_utf8.f")).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Tokenize);
    assert!(error.to_string().contains("03_invalid_utf8.f"));
    // Nothing in the file ran.
    assert!(interpreter.stack().is_empty());
}
