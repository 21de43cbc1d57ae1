//! Integration tests for the `hubnet` binary

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn sample(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../data")
        .join(file)
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = cargo_bin_cmd!("hubnet");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("solve"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("solvers"));
}

#[test]
fn test_solvers_lists_default_backend() {
    let mut cmd = cargo_bin_cmd!("hubnet");
    cmd.arg("solvers")
        .assert()
        .success()
        .stdout(predicate::str::contains("microlp (default)"));
}

#[test]
fn test_solve_sample_plain() {
    let mut cmd = cargo_bin_cmd!("hubnet");
    cmd.arg("solve")
        .arg(sample("lima_instance.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Active hubs: H1"))
        .stdout(predicate::str::contains("Route for satellite S1"))
        .stdout(predicate::str::contains("exceeds vehicle capacity by 2 units"))
        .stdout(predicate::str::contains("Inter-hub links: none"))
        .stdout(predicate::str::contains("TOTAL COST: $118.30"));
}

#[test]
fn test_solve_yaml_to_json_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("report.json");

    let mut cmd = cargo_bin_cmd!("hubnet");
    cmd.args(["--log-level", "warn", "solve"])
        .arg(sample("lima_instance.yaml"))
        .args(["--format", "json", "--out"])
        .arg(&out)
        .assert()
        .success();

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(report["outcome"], "optimal");
    assert_eq!(report["active_hubs"].as_array().unwrap().len(), 1);
    assert!((report["total_cost"].as_f64().unwrap() - 118.3).abs() < 1e-6);
    assert_eq!(report["hub_links"].as_array().unwrap().len(), 0);
}

#[test]
fn test_solve_json_stdout_is_parseable() {
    let mut cmd = cargo_bin_cmd!("hubnet");
    let output = cmd
        .arg("solve")
        .arg(sample("lima_instance.json"))
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["routes"][0]["satellite"], "S1");
    assert_eq!(report["routes"][0]["capacity_warning"]["trips_needed"], 2);
}

#[test]
fn test_infeasible_instance_is_reported_not_failed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stranded.yaml");
    fs::write(
        &path,
        "hubs: [H1]\nsatellites: [S1, S2]\nclients: [C1, C2]\n\
         demand: {C1: 1, C2: 1}\nvehicle_capacity: 10\n\
         costs:\n  hub: {H1: 1}\n  satellite: {S1: 1, S2: 1}\n\
         \x20 client_satellite:\n    - {pair: [C1, S1], cost: 1}\n\
         \x20 satellite_hub:\n    - {pair: [S1, H1], cost: 1}\n    - {pair: [S2, H1], cost: 1}\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("hubnet");
    cmd.arg("solve")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No optimal solution found (status: infeasible)"))
        .stdout(predicate::str::contains("TOTAL COST").not());
}

#[test]
fn test_unknown_solver_fails() {
    let mut cmd = cargo_bin_cmd!("hubnet");
    cmd.arg("solve")
        .arg(sample("lima_instance.json"))
        .args(["--solver", "gurobi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'gurobi' is unknown"));
}

#[test]
fn test_bad_threshold_fails_before_loading() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[report]\nassignment_threshold = 1.5\n").unwrap();

    let mut cmd = cargo_bin_cmd!("hubnet");
    cmd.arg("--config")
        .arg(&config)
        .args(["solve", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("assignment_threshold"))
        .stderr(predicate::str::contains("does-not-exist.json").not());
}

#[test]
fn test_misspelled_cost_table_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("typo.json");
    fs::write(
        &path,
        r#"{"hubs": ["H1"], "satellites": ["S1"], "clients": ["C1"], "demand": {"C1": 1},
            "vehicle_capacity": 10,
            "costs": {"hub": {"H1": 1}, "satellite": {"S1": 1},
                      "client_satelite": [{"pair": ["C1", "S1"], "cost": 1}],
                      "satellite_hub": [{"pair": ["S1", "H1"], "cost": 1}]}}"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("hubnet");
    cmd.arg("solve")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("client_satelite"));
}

#[test]
fn test_config_file_sets_format() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[report]\nformat = \"json\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("hubnet");
    cmd.arg("--config")
        .arg(&config)
        .arg("solve")
        .arg(sample("lima_instance.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"outcome\": \"optimal\""));
}

#[test]
fn test_validate_sample() {
    let mut cmd = cargo_bin_cmd!("hubnet");
    cmd.arg("validate")
        .arg(sample("lima_instance.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("2 hubs, 2 satellites, 5 clients"))
        .stdout(predicate::str::contains("0 errors"));
}

#[test]
fn test_validate_broken_instance_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(
        &path,
        r#"{"hubs": ["X"], "satellites": ["X"], "clients": ["C1"], "demand": {"C1": -2}, "vehicle_capacity": 10}"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("hubnet");
    cmd.arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error:"))
        .stderr(predicate::str::contains("is invalid"));
}

#[test]
fn test_missing_instance_fails() {
    let mut cmd = cargo_bin_cmd!("hubnet");
    cmd.args(["solve", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.json"));
}
