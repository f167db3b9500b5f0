use std::fs;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

const PLATE: &str = "\
Well\tSample Name\tReporter\tCt
A1\tStd 1\tFAM\t24.0
A1\tStd 1\tVIC\t23.9
A1\tStd 1\tROX\t25.0
A2\tStd 2\tFAM\t23.0
A2\tStd 2\tVIC\t22.9
A2\tStd 2\tROX\t25.0
H12\tNTC\tFAM\tUndetermined
H12\tNTC\tVIC\tUndetermined
H12\tNTC\tROX\tUndetermined
D1\tProband\tFAM\tUndetermined
D1\tProband\tVIC\t23.9
D1\tProband\tROX\t25.0
";

#[test]
fn run_command_writes_outputs() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("plate.tsv");
    fs::write(&input, PLATE).unwrap();
    let out = tmp.path().join("out");

    let mut cmd = Command::cargo_bin("kira-smacn").unwrap();
    cmd.arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .args(["--ntc", "H12", "--ref1", "A1", "--ref2", "A2", "--json", "--tsv"]);
    cmd.assert().success();

    let json: Value =
        serde_json::from_str(&fs::read_to_string(out.join("smacn.json")).unwrap()).unwrap();
    assert_eq!(json["qc"]["status"], "pass");
    assert_eq!(json["samples"][0]["diagnosis"], "affected");
    assert!(out.join("smacn.tsv").exists());
}

#[test]
fn config_file_is_overridden_by_flags() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("plate.tsv");
    fs::write(&input, PLATE).unwrap();
    let config = tmp.path().join("cfg.json");
    fs::write(&config, r#"{"mode":"restricted","runLabel":"from-file"}"#).unwrap();
    let out = tmp.path().join("out");

    let mut cmd = Command::cargo_bin("kira-smacn").unwrap();
    cmd.arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .arg("--config")
        .arg(&config)
        .args(["--ntc", "H12", "--ref1", "A1", "--ref2", "A2"])
        .args(["--mode", "relaxed", "--json"]);
    cmd.assert().success();

    let json: Value =
        serde_json::from_str(&fs::read_to_string(out.join("smacn.json")).unwrap()).unwrap();
    assert_eq!(json["config"]["mode"], "relaxed");
    assert_eq!(json["config"]["run_label"], "from-file");
}

#[test]
fn invalid_config_exits_nonzero() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("plate.tsv");
    fs::write(&input, PLATE).unwrap();

    let mut cmd = Command::cargo_bin("kira-smacn").unwrap();
    cmd.arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(tmp.path().join("out"))
        .args(["--ntc", "H12", "--ref1", "A1", "--ref2", "H12", "--json"]);
    cmd.assert().failure();
}

#[test]
fn validate_command_reports_qc() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("plate.tsv");
    fs::write(&input, PLATE.replace("H12\tNTC\tFAM\tUndetermined", "H12\tNTC\tFAM\t29.1")).unwrap();

    let mut cmd = Command::cargo_bin("kira-smacn").unwrap();
    cmd.arg("validate")
        .arg("--input")
        .arg(&input)
        .args(["--ntc", "H12", "--ref1", "A1", "--ref2", "A2"]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    assert!(stdout.contains("kira-smacn validate: fail"));
    assert!(stdout.contains("ntc_amplified"));
}
