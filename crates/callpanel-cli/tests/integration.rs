#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn callpanel() -> Command {
    let mut cmd = Command::cargo_bin("callpanel").unwrap();
    cmd.env_remove("CALLPANEL_CONFIG")
        .env_remove("CALLPANEL_URL")
        .env_remove("CALLPANEL_OFFICE")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir, yaml: &str) -> std::path::PathBuf {
    let path = dir.path().join("callpanel.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

#[test]
fn help_lists_commands() {
    callpanel()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("bindings"))
        .stdout(predicate::str::contains("call-chamber"))
        .stdout(predicate::str::contains("ping"));
}

#[test]
fn unknown_office_is_rejected_by_the_parser() {
    callpanel()
        .args(["--office", "mayor", "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown office 'mayor'"));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_show_uses_flags_over_defaults() {
    callpanel()
        .args([
            "config",
            "show",
            "--base-url",
            "http://results.example",
            "--office",
            "house",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "panel:  http://results.example/elections17-alabama/calls/house/",
        ))
        .stdout(predicate::str::contains(
            "health: http://results.example/elections17-alabama/test/",
        ));
}

#[test]
fn config_show_reads_env() {
    callpanel()
        .env("CALLPANEL_OFFICE", "governor")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/calls/governor/"));
}

#[test]
fn config_show_json_has_derived_urls() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "project_slug: elections18-general\n");

    let output = callpanel()
        .arg("--json")
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value["panel_url"],
        "http://localhost:8000/elections18-general/calls/senate/"
    );
    assert_eq!(value["config"]["refresh_interval_secs"], 10);
    assert_eq!(value["warnings"].as_array().unwrap().len(), 0);
}

#[test]
fn config_validate_passes_on_defaults() {
    callpanel()
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_validate_fails_on_errors() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "refresh_interval_secs: 0\n");

    callpanel()
        .arg("--config")
        .arg(&path)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "[error] refresh_interval_secs must be at least 1",
        ))
        .stderr(predicate::str::contains(
            "error: config validation found errors",
        ));
}

#[test]
fn missing_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    callpanel()
        .arg("--config")
        .arg(dir.path().join("absent.yaml"))
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: failed to load config"));
}

// ---------------------------------------------------------------------------
// network commands
// ---------------------------------------------------------------------------

#[test]
fn ping_unreachable_server_exits_nonzero() {
    callpanel()
        .args(["ping", "--base-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: server at http://127.0.0.1:9"));
}

#[test]
fn watch_refuses_zero_interval() {
    callpanel()
        .args(["watch", "--interval", "0", "--base-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "error: invalid config: refresh_interval_secs must be at least 1",
        ));
}

#[test]
fn bad_selector_fails_before_any_request() {
    callpanel()
        .args(["click", "accept-ap", "--base-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad selector 'accept-ap'"));
}

#[test]
fn bad_party_fails_before_any_request() {
    callpanel()
        .args(["call-chamber", "whig", "--base-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown party 'whig'"));
}

#[test]
fn accept_requires_race_fields() {
    callpanel()
        .args(["accept", "--race-id", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--statepostal"));
}
