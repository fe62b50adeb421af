use std::path::Path;

use assert_cmd::Command;
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

fn rox() -> Command {
    Command::cargo_bin("rox").unwrap()
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

/// Collects the text after each `// expect: ` marker, in file order.
fn find_expects(filename: &Path) -> Vec<String> {
    let content = std::fs::read_to_string(filename)
        .unwrap_or_else(|_| panic!("failed to read {}", filename.display()));

    let marker = "// expect: ";
    content
        .lines()
        .filter_map(|line| line.rfind(marker).map(|idx| line[idx + marker.len()..].to_string()))
        .collect()
}

#[test]
fn run_all_programs() {
    let entries = WalkDir::new("./tests/data/programs")
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file());

    let mut ran = 0;
    for entry in entries {
        let filename = entry.path();
        let expected = find_expects(filename).join("\n");

        let output = rox().arg("run").arg(filename).output().unwrap();
        let stdout = stdout_of(&output);
        let stderr = stderr_of(&output);

        assert!(output.status.success(), "{}: stderr={}", filename.display(), stderr);
        assert_eq!(expected, stdout.trim_end(), "{}", filename.display());
        ran += 1;
    }

    assert!(ran > 0, "no programs found");
}

#[test]
fn runtime_error_exits_70_after_partial_output() {
    let output = rox()
        .args(["run", "tests/data/errors/runtime.lox"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(70));
    assert_eq!(stdout_of(&output), "before\n");
    assert_eq!(
        stderr_of(&output),
        "Operands must be two numbers or two strings.\n[line 2]\n"
    );
}

#[test]
fn syntax_errors_exit_65_without_running() {
    let output = rox()
        .args(["run", "tests/data/errors/syntax.lox"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(65));
    assert_eq!(stdout_of(&output), "");
    assert_eq!(
        stderr_of(&output),
        "[line 2] Error at '=': Expect variable name.\n\
         [line 3] Error at ';': Expect ')' after expression.\n"
    );
}

#[test]
fn resolution_errors_exit_65() {
    let output = rox()
        .args(["run", "tests/data/errors/resolve.lox"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(65));
    assert_eq!(
        stderr_of(&output),
        "[line 2] Error at 'a': Can't read local variable in its own initializer.\n\
         [line 4] Error at 'return': Can't return from top-level code.\n"
    );
}

#[test]
fn tokenize_prints_every_token() {
    rox()
        .args(["tokenize", "tests/data/tokens.lox"])
        .assert()
        .success()
        .stdout(
            "VAR var null\n\
             IDENTIFIER x null\n\
             EQUAL = null\n\
             NUMBER 1 1.0\n\
             SEMICOLON ; null\n\
             EOF  null\n",
        );
}

#[test]
fn parse_prints_prefix_form() {
    rox()
        .args(["parse", "tests/data/statements.lox"])
        .assert()
        .success()
        .stdout("(print (+ 1.0 2.0))\n(var a)\n");
}

#[test]
fn parse_json_emits_the_tree() {
    let output = rox()
        .args(["parse", "--json", "tests/data/statements.lox"])
        .output()
        .unwrap();

    assert!(output.status.success());

    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let statements = tree.as_array().unwrap();
    assert_eq!(statements.len(), 2);
    assert!(statements[0].get("Print").is_some());
    assert!(statements[1].get("Var").is_some());
}

#[test]
fn evaluate_prints_the_value() {
    rox()
        .args(["evaluate", "tests/data/expression.lox"])
        .assert()
        .success()
        .stdout("9\n");

    rox()
        .args(["evaluate", "tests/data/bad_expression.lox"])
        .assert()
        .code(70)
        .stderr("Operand must be a number.\n[line 1]\n");
}

#[test]
fn repl_keeps_state_and_survives_errors() {
    let output = rox()
        .arg("run")
        .write_stdin("var a = 1;\nprint nope;\nprint a + 1;\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "> > > 2\n> ");
    assert_eq!(stderr_of(&output), "Undefined variable 'nope'.\n[line 1]\n");
}

#[test]
fn missing_file_is_a_host_error() {
    let output = rox()
        .args(["run", "tests/data/does-not-exist.lox"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Failed to open file"));
}

#[test]
fn log_flag_writes_the_log_file() {
    let log_file = std::env::temp_dir().join(format!("rox-cli-{}.log", std::process::id()));

    rox()
        .arg("--log")
        .arg("--log-file")
        .arg(&log_file)
        .args(["run", "tests/data/programs/numbers.lox"])
        .assert()
        .success();

    let log = std::fs::read_to_string(&log_file).unwrap();
    let _ = std::fs::remove_file(&log_file);

    assert!(log.contains("Logger initialized"), "{}", log);
}

#[test]
fn bad_usage_exits_64() {
    rox().assert().code(64);
    rox().arg("compile").assert().code(64);
    rox().args(["run", "a.lox", "b.lox"]).assert().code(64);

    rox().arg("--help").assert().success();
}

#[test]
fn deep_recursion_does_not_abort_the_process() {
    let dir = std::env::temp_dir();
    let script = dir.join(format!("rox-deep-{}.lox", std::process::id()));
    std::fs::write(
        &script,
        "fun f(n) { if (n == 0) return 0; { { return (((f(n - 1) + 1))); } } }\n\
         print f(254);\n\
         fun spin(n) { return spin(n + 1); }\n\
         spin(0);\n",
    )
    .unwrap();

    let output = rox().arg("run").arg(&script).output().unwrap();
    let _ = std::fs::remove_file(&script);

    assert_eq!(output.status.code(), Some(70));
    assert_eq!(stdout_of(&output), "254\n");
    assert_eq!(stderr_of(&output), "Stack overflow.\n[line 3]\n");
}
