use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn help_shows_core_commands_only() {
    let mut cmd = cargo_bin_cmd!("sqlpf");
    cmd.arg("--help");
    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8_lossy(&output);

    for name in ["partition-functions", "config"] {
        assert!(stdout.contains(name), "missing core command: {}", name);
    }
    assert!(
        !stdout.contains("completions"),
        "advanced command leaked: completions"
    );
}

#[test]
fn help_all_shows_advanced_commands() {
    let mut cmd = cargo_bin_cmd!("sqlpf");
    cmd.args(["help", "--all"]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8_lossy(&output);

    assert!(stdout.contains("completions"), "missing advanced command");
}

#[test]
fn help_for_partition_functions_lists_filters() {
    let mut cmd = cargo_bin_cmd!("sqlpf");
    cmd.args(["help", "partition-functions"]);
    cmd.assert().success().stdout(
        predicate::str::contains("--exclude-database")
            .and(predicate::str::contains("--partition-function"))
            .and(predicate::str::contains("--enable-exception")),
    );
}

#[test]
fn help_for_unknown_command_fails() {
    let mut cmd = cargo_bin_cmd!("sqlpf");
    cmd.args(["help", "tables"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown command: tables"));
}

#[test]
fn completions_generate_for_bash() {
    let mut cmd = cargo_bin_cmd!("sqlpf");
    cmd.args(["completions", "--shell", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("partition-functions"));
}
