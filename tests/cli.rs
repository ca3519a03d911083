//! The `minishell` binary driven with `-c`.

use std::fs;
use std::process::Command;

fn minishell() -> Command {
    Command::new(env!("CARGO_BIN_EXE_minishell"))
}

#[test]
fn exec_failure_is_reported_on_stderr() {
    let tmp = tempfile::tempdir().unwrap();
    let err = tmp.path().join("err");

    let status = minishell()
        .arg("-c")
        .arg(format!("minishell-no-such-xyz 2> {}", err.display()))
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
    assert_eq!(
        fs::read_to_string(&err).unwrap(),
        "Execution failed for 'minishell-no-such-xyz'\n"
    );
}

#[test]
fn one_shot_line_exits_with_its_status() {
    let status = minishell().args(["-c", "true && false"]).status().unwrap();
    assert_eq!(status.code(), Some(1));

    let status = minishell().args(["-c", "false || true"]).status().unwrap();
    assert_eq!(status.code(), Some(0));
}

#[test]
fn one_shot_parse_error_exits_with_two() {
    let output = minishell().args(["-c", "true &&"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Parse error:"));
}

#[test]
fn one_shot_output_goes_to_stdout() {
    let output = minishell()
        .args(["-c", "echo one | tr a-z A-Z"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "ONE\n");
}
