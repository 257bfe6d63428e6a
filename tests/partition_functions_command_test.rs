mod common;

use predicates::prelude::*;

// Port 1 on loopback refuses connections immediately, which exercises the
// per-instance failure path without a server.
const UNREACHABLE: &str = "127.0.0.1,1";

#[test]
fn missing_instance_is_a_config_error() {
    let home = tempfile::tempdir().expect("tempdir");
    let mut cmd = common::isolated_cmd(home.path());
    cmd.args(["partition-functions", "--json"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("\"kind\": \"Config\""))
        .stderr(predicate::str::contains("No SQL instance specified"));
}

#[test]
fn invalid_instance_fails_before_connecting() {
    let home = tempfile::tempdir().expect("tempdir");
    let mut cmd = common::isolated_cmd(home.path());
    cmd.args(["pf", "srv1,notaport"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid SQL instance 'srv1,notaport'"));
}

#[test]
fn user_without_password_fails_before_scanning() {
    let home = tempfile::tempdir().expect("tempdir");
    let mut cmd = common::isolated_cmd(home.path());
    cmd.args(["pf", UNREACHABLE, "--user", "sa", "--timeout", "2000", "--json"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("\"kind\": \"Config\""))
        .stderr(predicate::str::contains("Password is required for SQL authentication"));
}

#[test]
fn unreachable_instance_is_a_warning_by_default() {
    let home = tempfile::tempdir().expect("tempdir");
    let mut cmd = common::isolated_cmd(home.path());
    cmd.args(["partition-functions", UNREACHABLE, "--timeout", "2000", "--json"]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("json");

    assert_eq!(value["success"], true);
    assert_eq!(value["instancesScanned"], 0);
    assert_eq!(value["count"], 0);
    assert_eq!(value["partitionFunctions"].as_array().map(Vec::len), Some(0));
    assert_eq!(value["warnings"][0]["kind"], "connection");
    assert_eq!(value["warnings"][0]["instance"], UNREACHABLE);
    assert!(
        value["warnings"][0]["message"]
            .as_str()
            .unwrap_or_default()
            .starts_with("Failure connecting to 127.0.0.1,1")
    );
}

#[test]
fn unreachable_instance_fails_with_enable_exception() {
    let home = tempfile::tempdir().expect("tempdir");
    let mut cmd = common::isolated_cmd(home.path());
    cmd.args([
        "partition-functions",
        UNREACHABLE,
        "--timeout",
        "2000",
        "--enable-exception",
        "--json",
    ]);

    let assert = cmd
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"kind\": \"Connection\""));
    let output = assert.get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("json");
    assert_eq!(value["success"], false);
    assert_eq!(value["errors"][0]["kind"], "connection");
}

#[test]
fn instances_can_be_piped_on_stdin() {
    let home = tempfile::tempdir().expect("tempdir");
    let mut cmd = common::isolated_cmd(home.path());
    cmd.args(["pf", "-", "--timeout", "2000", "--json"])
        .write_stdin(format!("# inventory\n{}\n\n", UNREACHABLE));

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("json");
    assert_eq!(value["warnings"].as_array().map(Vec::len), Some(1));
    assert_eq!(value["warnings"][0]["instance"], UNREACHABLE);
}

#[test]
fn table_output_reports_summary() {
    let home = tempfile::tempdir().expect("tempdir");
    let mut cmd = common::isolated_cmd(home.path());
    cmd.args(["pf", UNREACHABLE, "--timeout", "2000", "--markdown"]);
    cmd.assert().success().stdout(
        predicate::str::contains("NumberOfPartitions")
            .and(predicate::str::contains("0 partition function(s) from 0 instance(s), 1 warning(s)")),
    );
}

#[test]
fn csv_export_writes_header() {
    let home = tempfile::tempdir().expect("tempdir");
    let path = home.path().join("pf.csv");
    let mut cmd = common::isolated_cmd(home.path());
    cmd.args(["pf", UNREACHABLE, "--timeout", "2000", "--all-columns", "--quiet", "--csv"])
        .arg(&path);
    cmd.assert().success().stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&path).expect("csv");
    assert!(written.starts_with("ComputerName,InstanceName,SqlInstance,Database,CreateDate"));
    assert!(written.trim_end().ends_with("IsSystem"));
}

#[test]
fn live_scan_returns_records() {
    if !common::integration_enabled() {
        eprintln!("skipping live scan; set SQLPF_INTEGRATION_TESTS=1");
        return;
    }

    let value = common::run_json(["partition-functions", "--json"]);
    assert_eq!(value["success"], true);
    assert!(value["instancesScanned"].as_u64().unwrap_or_default() >= 1);
    for record in value["partitionFunctions"].as_array().into_iter().flatten() {
        assert!(record["SqlInstance"].is_string());
        assert!(record["NumberOfPartitions"].as_i64().unwrap_or_default() >= 1);
    }
}
