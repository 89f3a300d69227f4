//! Integration tests for validate, resolve, order, and bundle flows.

use std::path::PathBuf;
use std::process::Command;

fn blueprint_check_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_blueprint-check"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

// ---- validate tests ----

#[test]
fn test_validate_success_json_output() {
    let output = Command::new(blueprint_check_bin())
        .arg("validate")
        .arg(fixture("modules"))
        .arg("--values")
        .arg(fixture("values.yaml"))
        .output()
        .expect("failed to run blueprint-check");

    assert!(
        output.status.success(),
        "validate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("Invalid JSON output: {e}\n{stdout}"));
    assert_eq!(parsed["errors"], serde_json::json!([]));
    // Nested default filled through the `{}` default.
    assert_eq!(
        parsed["resolved"]["cluster"]["private_cluster_config"]["master_global_access"],
        serde_json::json!(true)
    );
    assert_eq!(
        parsed["resolved"]["vpc"]["vpc_create"]["mtu"],
        serde_json::json!(1460)
    );
}

#[test]
fn test_validate_missing_required_fails_with_path() {
    let output = Command::new(blueprint_check_bin())
        .arg("validate")
        .arg(fixture("modules"))
        .arg("--values")
        .arg(fixture("values-missing.yaml"))
        .output()
        .expect("failed to run blueprint-check");

    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let errors = parsed["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["kind"], "missing_required");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed with 1 error(s)"));
}

#[test]
fn test_validate_yaml_output() {
    let output = Command::new(blueprint_check_bin())
        .arg("validate")
        .arg(fixture("modules"))
        .arg("--values")
        .arg(fixture("values.yaml"))
        .arg("--format")
        .arg("yaml")
        .output()
        .expect("failed to run blueprint-check");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("errors: []"), "unexpected output:\n{stdout}");
}

// ---- resolve tests ----

#[test]
fn test_resolve_reports_missing_capacity() {
    let output = Command::new(blueprint_check_bin())
        .arg("resolve")
        .arg("--schema")
        .arg(fixture("share-schema.yaml"))
        .arg("--values")
        .arg(fixture("share-values.yaml"))
        .output()
        .expect("failed to run blueprint-check");

    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let errors: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let errors = errors.as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["kind"], "missing_required");
    assert_eq!(errors[0]["path"], serde_json::json!([{"field": "capacity_gb"}]));
}

// ---- order tests ----

#[test]
fn test_order_lists_references_first() {
    let output = Command::new(blueprint_check_bin())
        .arg("order")
        .arg(fixture("modules"))
        .output()
        .expect("failed to run blueprint-check");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["vpc", "cluster"]);
}

// ---- bundle tests ----

#[test]
fn test_bundle_then_validate_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let bundle_path = dir.path().join("accelerator-cluster.json");

    let output = Command::new(blueprint_check_bin())
        .arg("bundle")
        .arg(fixture("modules"))
        .arg("--output")
        .arg(&bundle_path)
        .arg("--name")
        .arg("accelerator-cluster")
        .output()
        .expect("failed to run blueprint-check");

    assert!(
        output.status.success(),
        "bundle failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let raw = std::fs::read_to_string(&bundle_path).unwrap();
    let blueprint: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(blueprint["name"], "accelerator-cluster");
    assert!(blueprint["bundle_hash"].is_string());
    assert_eq!(blueprint["modules"].as_array().unwrap().len(), 2);

    // The written bundle is itself a valid input.
    let output = Command::new(blueprint_check_bin())
        .arg("validate")
        .arg(&bundle_path)
        .arg("--values")
        .arg(fixture("values.yaml"))
        .output()
        .expect("failed to run blueprint-check");
    assert!(
        output.status.success(),
        "validate of bundle failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
