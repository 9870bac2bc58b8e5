//! CLI behaviour tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::{fixture, temp_log, LogBuilder, NODE};

fn arblog(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("arblog").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_DATA_HOME", home.path().join(".local").join("share"))
        .env("NO_COLOR", "1")
        .env_remove("ARBLOG_LOG");
    cmd
}

#[test]
fn parse_fixture_prints_report() {
    let home = TempDir::new().unwrap();
    arblog(&home)
        .args(["parse", "--quiet"])
        .arg(fixture("arbitration.log"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Mission 1"))
        .stdout(predicate::str::contains("SolNode64"))
        .stdout(predicate::str::contains("SolNode41"))
        .stdout(predicate::str::contains("SolNode149").not())
        .stderr(predicate::str::is_empty());
}

#[test]
fn parse_shows_progress_unless_quiet() {
    let home = TempDir::new().unwrap();
    arblog(&home)
        .arg("parse")
        .arg(fixture("arbitration.log"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Parsing"))
        .stderr(predicate::str::contains("100%"));
}

#[test]
fn count_and_min_flags_widen_the_window() {
    let home = TempDir::new().unwrap();
    arblog(&home)
        .args(["parse", "--quiet", "--count", "3", "--min", "30"])
        .arg(fixture("arbitration.log"))
        .assert()
        .success()
        .stdout(predicate::str::contains("SolNode149"))
        .stdout(predicate::str::contains("Mission 3"));
}

#[test]
fn json_output_is_valid() {
    let home = TempDir::new().unwrap();
    let output = arblog(&home)
        .args(["parse", "--quiet", "--json"])
        .arg(fixture("arbitration.log"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["validTotal"], 2);
    assert_eq!(json["missions"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["missions"][0]["waveCount"], 4);
    assert_eq!(json["missions"][1]["missionKind"], "roundBased");
    assert_eq!(json["warnings"].as_array().map(Vec::len), Some(0));
}

#[test]
fn warnings_are_printed_as_notes() {
    let home = TempDir::new().unwrap();
    let (_dir, path) = temp_log(&LogBuilder::new().mission(100.0, NODE, 120.0, 1));
    arblog(&home)
        .args(["parse", "--quiet"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Note: Only 1 valid mission(s) found"));
}

#[test]
fn log_without_missions_reports_nothing_found() {
    let home = TempDir::new().unwrap();
    let (_dir, path) = temp_log(&LogBuilder::new().noise(1.0).noise(2.0));
    arblog(&home)
        .args(["parse", "--quiet"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No valid missions found"))
        .stdout(predicate::str::contains(
            "Note: No Arbitration mission start marker found in the log",
        ));
}

#[test]
fn missing_file_fails() {
    let home = TempDir::new().unwrap();
    arblog(&home)
        .args(["parse", "--quiet", "/definitely/missing/EE.log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open log file"));
}

#[test]
fn zero_count_is_rejected() {
    let home = TempDir::new().unwrap();
    arblog(&home)
        .args(["parse", "--quiet", "--count", "0"])
        .arg(fixture("arbitration.log"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--count must be at least 1"));
}

#[test]
fn zero_minimum_is_rejected() {
    let home = TempDir::new().unwrap();
    arblog(&home)
        .args(["parse", "--quiet", "--min", "0"])
        .arg(fixture("arbitration.log"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--min must be a positive number"));
}

#[test]
fn path_is_read_from_stdin_when_nothing_configured() {
    let home = TempDir::new().unwrap();
    let log = fixture("arbitration.log");
    arblog(&home)
        .args(["parse", "--quiet"])
        .write_stdin(format!("{}\n", log.display()))
        .assert()
        .success()
        .stderr(predicate::str::contains("Enter the path to EE.log"))
        .stdout(predicate::str::contains("SolNode41"));
}

#[test]
fn empty_stdin_path_fails() {
    let home = TempDir::new().unwrap();
    arblog(&home)
        .args(["parse", "--quiet"])
        .write_stdin("\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No log file path provided"));
}

#[test]
fn configured_log_path_is_used() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config").join("arblog");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            "[parse]\ncount = 1\n\n[log]\npath = {:?}\n",
            fixture("arbitration.log").display().to_string()
        ),
    )
    .unwrap();

    arblog(&home)
        .args(["parse", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SolNode41"))
        .stdout(predicate::str::contains("SolNode64").not());
}

#[test]
fn invalid_config_is_reported() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config").join("arblog");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[parse]\nchunk_bytes = 0\n").unwrap();

    arblog(&home)
        .args(["parse", "--quiet"])
        .arg(fixture("arbitration.log"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn verbose_enables_debug_logging() {
    let home = TempDir::new().unwrap();
    arblog(&home)
        .args(["parse", "--quiet", "--verbose"])
        .arg(fixture("arbitration.log"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Opened mission segment"));
}

#[test]
fn config_path_prints_location() {
    let home = TempDir::new().unwrap();
    arblog(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".config"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_show_prints_defaults() {
    let home = TempDir::new().unwrap();
    arblog(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[parse]"))
        .stdout(predicate::str::contains("count = 2"))
        .stdout(predicate::str::contains("min_duration_sec = 60.0"));
}

#[test]
fn completions_generate_for_bash() {
    let home = TempDir::new().unwrap();
    arblog(&home)
        .args(["completions", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("arblog"));
}

#[test]
fn version_includes_package_version() {
    let home = TempDir::new().unwrap();
    arblog(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
