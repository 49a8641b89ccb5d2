//! End-to-end tests of the `checkgate` binary against a fake cargo.

#![cfg(unix)]

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::FakeCargo;

const MESSAGES: [&str; 6] = [
    "Checking formatting",
    "Running cargo check",
    "Running clippy",
    "Checking dependency policy",
    "Checking for unused dependencies",
    "Running tests with coverage",
];

fn write_config(dir: &std::path::Path, extra: &str) {
    std::fs::write(
        dir.join(checkgate::config::CONFIG_FILE),
        format!("cargo: \"sh {}\"\n{extra}", common::SCRIPT),
    )
    .unwrap();
}

fn checkgate(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("checkgate").unwrap();
    cmd.arg("-C").arg(dir).args(["--color", "never"]);
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn success_prints_every_status_line_in_order() {
    let dir = common::workdir(&FakeCargo::default());
    write_config(dir.path(), "");

    let output = checkgate(dir.path()).assert().success().get_output().clone();
    let stdout = String::from_utf8(output.stdout).unwrap();

    let positions: Vec<usize> = MESSAGES
        .iter()
        .map(|m| stdout.find(m).unwrap_or_else(|| panic!("missing {m:?}")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(stdout.contains("fake: deny check"));
}

#[test]
fn failure_stops_output_and_propagates_status() {
    let dir = common::workdir(&FakeCargo {
        fail: Some(("deny", 5)),
        ..FakeCargo::default()
    });
    write_config(dir.path(), "");

    checkgate(dir.path())
        .assert()
        .code(5)
        .stdout(predicate::str::contains("Checking dependency policy"))
        .stdout(predicate::str::contains("Checking for unused dependencies").not())
        .stdout(predicate::str::contains("Running tests with coverage").not())
        .stderr(predicate::str::contains("deny failed"))
        .stderr(predicate::str::contains("step 'deny' failed: exited with status 5"));

    assert_eq!(common::calls(dir.path()).len(), 4);
}

#[test]
fn low_coverage_fails_the_run() {
    let dir = common::workdir(&FakeCargo {
        coverage_line: "79.99% coverage, 7999/10000 lines covered",
        ..FakeCargo::default()
    });
    write_config(dir.path(), "");

    checkgate(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("step 'coverage' failed"));
}

#[test]
fn list_prints_plan_without_running() {
    let dir = common::workdir(&FakeCargo::default());
    write_config(dir.path(), "test_timeout: 60\n");

    checkgate(dir.path())
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Checking formatting: sh fake-cargo.sh fmt --all -- --check"))
        .stdout(predicate::str::contains("--timeout 60 --out Html"));

    assert!(common::calls(dir.path()).is_empty());
}

#[test]
fn report_file_records_step_statuses() {
    let dir = common::workdir(&FakeCargo {
        fail: Some(("clippy", 101)),
        ..FakeCargo::default()
    });
    write_config(dir.path(), "");
    let report_path = dir.path().join("report.json");

    checkgate(dir.path())
        .arg("--report")
        .arg(&report_path)
        .assert()
        .code(101);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    let statuses: Vec<&str> = json["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, ["pass", "pass", "fail", "skipped", "skipped", "skipped"]);
    assert_eq!(json["steps"][2]["exit_code"], 101);
    assert_eq!(json["summary"]["failed"], 1);
}

#[test]
fn always_color_emits_escape_sequences() {
    let dir = common::workdir(&FakeCargo::default());
    write_config(dir.path(), "");

    let mut cmd = Command::cargo_bin("checkgate").unwrap();
    cmd.arg("-C")
        .arg(dir.path())
        .args(["--color", "always"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b["))
        .stdout(predicate::str::contains("\x1b[0m"));
}

#[test]
fn config_color_is_used_without_flag() {
    let dir = common::workdir(&FakeCargo::default());
    write_config(dir.path(), "color: never\n");

    let mut cmd = Command::cargo_bin("checkgate").unwrap();
    cmd.arg("-C")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b[").not());
}

#[test]
fn invalid_config_is_a_setup_failure() {
    let dir = common::workdir(&FakeCargo::default());
    write_config(dir.path(), "coverage_threshold: 150\n");

    checkgate(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("coverage_threshold"));

    assert!(common::calls(dir.path()).is_empty());
}

#[test]
fn explicit_config_path_overrides_default() {
    let dir = common::workdir(&FakeCargo::default());
    write_config(dir.path(), "coverage_threshold: 150\n");
    std::fs::write(
        dir.path().join("gate.yaml"),
        format!("cargo: \"sh {}\"\ncoverage_threshold: 95\n", common::SCRIPT),
    )
    .unwrap();

    checkgate(dir.path())
        .args(["--config", "gate.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("below the 95% threshold"));
}

#[test]
fn missing_directory_is_a_setup_failure() {
    let dir = tempfile::tempdir().unwrap();
    checkgate(&dir.path().join("nope"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn redirected_stderr_summary_is_plain_in_auto_mode() {
    let dir = common::workdir(&FakeCargo {
        fail: Some(("deny", 5)),
        ..FakeCargo::default()
    });
    write_config(dir.path(), "color: auto\n");

    let mut cmd = Command::cargo_bin("checkgate").unwrap();
    cmd.arg("-C")
        .arg(dir.path())
        .assert()
        .code(5)
        .stderr(predicate::str::contains("step 'deny' failed"))
        .stderr(predicate::str::contains("\x1b[").not());
}
