//! CLI E2E tests for `modraw-sim`.
//!
//! Validates:
//! - Single-file, folder and `@list` replays produce byte-identical outputs
//! - The text and JSON summaries on stdout
//! - Exit codes for usage, configuration, and capture-format errors
//! - `--config`, `--relative-only` and the speed environment variable

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::tempdir;

// ============================================================================
// Helpers
// ============================================================================

/// Get a Command for the modraw-sim binary.
fn modraw_sim() -> Command {
    let mut cmd = cargo_bin_cmd!("modraw-sim");
    cmd.timeout(Duration::from_secs(60));
    cmd.env_remove("MODRAW_SIM_SPEED");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn capture_bytes(offset_time: bool, ticks: &[u32]) -> Vec<u8> {
    let mut data = b"header_file_size_inbytes = 180\n\
TOTAL_HEADER_LINES = 5\n\
*****START_FCTD_HEADER_START_RUN*****\n"
        .to_vec();
    if offset_time {
        data.extend_from_slice(b"OFFSET_TIME = 1672531200\n");
    }
    data.extend_from_slice(b"%*****END_FCTD_HEADER_START_RUN*****\n");
    data.extend_from_slice(b"$SOM3,mission=1*4A\r\n");
    for (i, tick) in ticks.iter().enumerate() {
        data.extend_from_slice(format!("T{tick:06}$EFE,{i},0.25*3C\r\n").as_bytes());
    }
    data
}

fn write_capture(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}

// ============================================================================
// Successful replays
// ============================================================================

#[test]
fn test_single_file_replay() {
    let dir = tempdir().unwrap();
    let data = capture_bytes(true, &[100, 110, 120, 130]);
    let input = write_capture(dir.path(), "in.modraw", &data);
    let output = dir.path().join("out.modraw");

    modraw_sim()
        .args(["-s", "100", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .code(0)
        .stdout(predicate::str::contains("replayed 1 file(s): 5 packets"));

    assert_eq!(fs::read(&output).unwrap(), data);
}

#[test]
fn test_output_folder_keeps_input_name() {
    let dir = tempdir().unwrap();
    let out = tempdir().unwrap();
    let data = capture_bytes(true, &[0, 1]);
    let input = write_capture(dir.path(), "cast_07.modraw", &data);

    modraw_sim()
        .args(["-s", "100", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(out.path())
        .assert()
        .success();

    assert_eq!(fs::read(out.path().join("cast_07.modraw")).unwrap(), data);
}

#[test]
fn test_folder_batch_with_json_summary() {
    let dir = tempdir().unwrap();
    let out = tempdir().unwrap();
    let first = capture_bytes(true, &[0, 5]);
    let second = capture_bytes(true, &[10, 15, 20]);
    write_capture(dir.path(), "002.modraw", &second);
    write_capture(dir.path(), "001.modraw", &first);
    fs::write(dir.path().join("notes.txt"), b"not a capture").unwrap();

    let stdout = modraw_sim()
        .args(["-s", "100", "--format", "json", "-i"])
        .arg(dir.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&stdout).expect("parse JSON summary");
    assert_eq!(json["total_packets"], 7);
    assert_eq!(json["late_packets"], 0);
    let files = json["files"].as_array().expect("files should be an array");
    assert_eq!(files.len(), 2);
    assert!(files[0]["input"].as_str().unwrap().ends_with("001.modraw"));
    assert_eq!(files[1]["packets"], 4);

    assert_eq!(fs::read(out.path().join("001.modraw")).unwrap(), first);
    assert_eq!(fs::read(out.path().join("002.modraw")).unwrap(), second);
}

#[test]
fn test_list_file_batch() {
    let dir = tempdir().unwrap();
    let out = tempdir().unwrap();
    let data = capture_bytes(true, &[0, 3]);
    write_capture(dir.path(), "b.modraw", &data);
    write_capture(dir.path(), "a.modraw", &data);
    let list = dir.path().join("jobs.txt");
    fs::write(&list, "# replay order\nb.modraw\n\na.modraw\n").unwrap();

    let list_arg = format!("@{}", list.display());
    modraw_sim()
        .args(["-s", "100", "-i", list_arg.as_str()])
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("replayed 2 file(s)"));

    assert!(out.path().join("a.modraw").exists());
    assert!(out.path().join("b.modraw").exists());
}

#[test]
fn test_speed_from_config_file_and_env() {
    let dir = tempdir().unwrap();
    let data = capture_bytes(true, &[0, 50]);
    let input = write_capture(dir.path(), "in.modraw", &data);
    let output = dir.path().join("out.modraw");
    let config = dir.path().join("replay.json");
    fs::write(&config, r#"{"speed": 0}"#).unwrap();

    // The environment overrides the config file's invalid speed.
    modraw_sim()
        .env("MODRAW_SIM_SPEED", "250")
        .arg("--config")
        .arg(&config)
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    // Without it the config file's speed is used and rejected.
    modraw_sim()
        .arg("--config")
        .arg(&config)
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("strictly positive"));
}

#[test]
fn test_relative_only_accepts_header_without_offset() {
    let dir = tempdir().unwrap();
    let data = capture_bytes(false, &[0, 10]);
    let input = write_capture(dir.path(), "in.modraw", &data);
    let output = dir.path().join("out.modraw");

    modraw_sim()
        .args(["-s", "100", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .code(11)
        .stderr(predicate::str::contains("OFFSET_TIME"));

    modraw_sim()
        .args(["-s", "100", "--relative-only", "-v", "--log-format", "json", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();
    assert_eq!(fs::read(&output).unwrap(), data);
}

// ============================================================================
// Failures and exit codes
// ============================================================================

#[test]
fn test_missing_arguments_is_usage_error() {
    modraw_sim().assert().failure().code(2);
}

#[test]
fn test_help_exits_clean() {
    modraw_sim()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--relative-only"));
}

#[test]
fn test_invalid_speed_is_config_error() {
    let dir = tempdir().unwrap();
    let input = write_capture(dir.path(), "in.modraw", &capture_bytes(true, &[0]));

    modraw_sim()
        .args(["-s", "0", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out.modraw"))
        .assert()
        .failure()
        .code(10);
}

#[test]
fn test_missing_input_is_config_error() {
    let dir = tempdir().unwrap();
    modraw_sim()
        .arg("-i")
        .arg(dir.path().join("absent.modraw"))
        .arg("-o")
        .arg(dir.path().join("out.modraw"))
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("doesn't exist"));
}

#[test]
fn test_batch_output_must_be_a_folder() {
    let dir = tempdir().unwrap();
    write_capture(dir.path(), "a.modraw", &capture_bytes(true, &[0]));
    let out = tempdir().unwrap();

    modraw_sim()
        .arg("-i")
        .arg(dir.path())
        .arg("-o")
        .arg(out.path().join("missing"))
        .assert()
        .failure()
        .code(10);
}

#[test]
fn test_malformed_header_is_format_error() {
    let dir = tempdir().unwrap();
    let input = write_capture(dir.path(), "bad.modraw", b"not a header\n$SOM3*4A\r\n");
    let output = dir.path().join("out.modraw");

    modraw_sim()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .code(11)
        .stderr(predicate::str::contains("malformed header at line 1"))
        .stderr(predicate::str::contains("bad.modraw"));

    assert!(!output.exists());
}

#[test]
fn test_missing_start_packet_is_format_error() {
    let dir = tempdir().unwrap();
    let mut data = capture_bytes(true, &[]);
    let som_at = data.len() - b"$SOM3,mission=1*4A\r\n".len();
    data.truncate(som_at);
    data.extend_from_slice(b"T000001$EFE,1*11\r\n");
    let input = write_capture(dir.path(), "in.modraw", &data);

    modraw_sim()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out.modraw"))
        .assert()
        .failure()
        .code(11)
        .stderr(predicate::str::contains("start-of-mission"));
}
