#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::env;
use std::ffi::OsStr;
use std::path::Path;

pub fn integration_enabled() -> bool {
    env::var("SQLPF_INTEGRATION_TESTS")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// A `sqlpf` command isolated from the developer's own config files and
/// connection environment.
pub fn isolated_cmd(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("sqlpf");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    for var in [
        "SQLPF_CONFIG",
        "SQLPF_PROFILE",
        "SQL_INSTANCE",
        "SQL_PORT",
        "SQL_USER",
        "SQL_PASSWORD",
        "SQL_ENCRYPT",
        "SQL_TRUST_SERVER_CERTIFICATE",
        "SQL_CONNECT_TIMEOUT",
        "DATABASE_URL",
        "SQLSERVER_URL",
        "SQL_SERVER",
        "SQLSERVER_HOST",
        "SQLSERVER_PORT",
        "SQLSERVER_USER",
        "SQLSERVER_PASSWORD",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

pub fn run_json<I, S>(args: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = cargo_bin_cmd!("sqlpf");
    cmd.args(args);
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("json")
}
