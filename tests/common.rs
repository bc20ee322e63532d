#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use serde_json::Value;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Binary under test, isolated from the real user config.
pub fn hl() -> Command {
    let home = env::temp_dir().join("hourledger_test_home");
    fs::create_dir_all(&home).ok();

    let mut cmd = cargo_bin_cmd!("hourledger");
    cmd.env("HOME", &home).env_remove("HOURLEDGER_LOG");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_hourledger.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize the schema without touching any config file
pub fn init_db(db_path: &str) {
    hl().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Run a ledger command and parse its stdout as JSON
pub fn json(db_path: &str, args: &[&str]) -> Value {
    let out = hl()
        .args(["--db", db_path])
        .args(args)
        .output()
        .expect("failed to run hourledger");
    assert!(
        out.status.success(),
        "command {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).expect("stdout is not JSON")
}

pub fn add_event(db_path: &str, user: &str, date: &str, hours: &str) -> Value {
    json(
        db_path,
        &[
            "event", "add", "--user", user, "--date", date, "--name", user, "--reason", "work",
            "--hours", hours,
        ],
    )
}
