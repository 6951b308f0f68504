//! CLI integration tests

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run `ia` with an isolated home directory so no user config leaks in
fn ia(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ia"))
        .args(args)
        .env("HOME", home)
        .env_remove("IA_API_URL")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn write_feed(dir: &TempDir) -> PathBuf {
    let feed = json!([
        {
            "instance_id": "t3.micro", "provider": "aws", "vcpus": 2, "memory_gb": 1,
            "hourly_on_demand_price_usd": 0.0104, "network_performance_gbps": 5,
            "storage_type": "EBS only", "category": "General purpose"
        },
        {
            "instance_id": "m5.large", "provider": "aws", "vcpus": 2, "memory_gb": 8,
            "hourly_on_demand_price_usd": 0.096, "network_performance_gbps": 10,
            "storage_type": "EBS only", "category": "General purpose"
        },
        {
            "instance_id": "m5d.xlarge", "provider": "aws", "vcpus": 4, "memory_gb": 16,
            "hourly_on_demand_price_usd": 0.226, "network_performance_gbps": 10,
            "storage_type": "1 x 150 NVMe SSD", "category": "General purpose"
        },
        {"instance_id": "broken", "vcpus": 2}
    ]);
    let path = dir.path().join("feed.json");
    std::fs::write(&path, feed.to_string()).unwrap();
    path
}

fn build_catalog(dir: &TempDir) -> PathBuf {
    let feed = write_feed(dir);
    let catalog = dir.path().join("catalog.json");
    let output = ia(
        dir.path(),
        &[
            "catalog",
            "ingest",
            "--input",
            feed.to_str().unwrap(),
            "--output",
            catalog.to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "ingest should succeed");
    catalog
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    let output = ia(dir.path(), &["--help"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Instance Advisor"), "Should show app name");
    assert!(stdout.contains("recommend"), "Should show recommend command");
    assert!(stdout.contains("catalog"), "Should show catalog command");
    assert!(stdout.contains("rules"), "Should show rules command");
    assert!(stdout.contains("status"), "Should show status command");
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    let output = ia(dir.path(), &["--version"]);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout(&output).contains("ia"), "Should show binary name");
}

#[test]
fn test_recommend_help() {
    let dir = TempDir::new().unwrap();
    let output = ia(dir.path(), &["recommend", "--help"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Recommend help should succeed");
    for flag in ["--tag", "--traffic", "--db-size", "--priority", "--storage", "--network", "--catalog"] {
        assert!(stdout.contains(flag), "Should show {} option", flag);
    }
}

#[test]
fn test_rejects_unknown_traffic_level() {
    let dir = TempDir::new().unwrap();
    let output = ia(dir.path(), &["recommend", "ecommerce", "--traffic", "extreme"]);
    assert!(!output.status.success());
}

#[test]
fn test_ingest_then_query() {
    let dir = TempDir::new().unwrap();
    let catalog = build_catalog(&dir);

    let output = ia(
        dir.path(),
        &[
            "catalog",
            "query",
            "--catalog",
            catalog.to_str().unwrap(),
            "--min-vcpu",
            "2",
            "--min-ram",
            "8",
            "--format",
            "json",
        ],
    );
    assert!(output.status.success(), "query should succeed");

    let instances: Value = serde_json::from_str(&stdout(&output)).unwrap();
    let names: Vec<&str> = instances
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["m5.large", "m5d.xlarge"]);
}

#[test]
fn test_offline_recommend_json() {
    let dir = TempDir::new().unwrap();
    let catalog = build_catalog(&dir);

    let output = ia(
        dir.path(),
        &[
            "recommend",
            "ecommerce",
            "--catalog",
            catalog.to_str().unwrap(),
            "--format",
            "json",
        ],
    );
    assert!(output.status.success(), "offline recommend should succeed");

    let rec: Value = serde_json::from_str(&stdout(&output)).unwrap();
    let results = rec["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0]["score"].as_f64().unwrap() >= results[1]["score"].as_f64().unwrap());
    assert!(rec["explanation"].as_str().unwrap().contains("ecommerce"));
    assert!(!rec["suggestions"].as_array().unwrap().is_empty());
}

#[test]
fn test_offline_recommend_with_limit_and_storage() {
    let dir = TempDir::new().unwrap();
    let catalog = build_catalog(&dir);

    let output = ia(
        dir.path(),
        &[
            "recommend",
            "custom",
            "--tag",
            "datasets",
            "--storage",
            "nvme_ssd",
            "--limit",
            "5",
            "--catalog",
            catalog.to_str().unwrap(),
            "--format",
            "json",
        ],
    );
    assert!(output.status.success());

    let rec: Value = serde_json::from_str(&stdout(&output)).unwrap();
    let results = rec["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "m5d.xlarge");
}

#[test]
fn test_offline_no_match_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let catalog = build_catalog(&dir);

    let output = ia(
        dir.path(),
        &[
            "recommend",
            "booking_system",
            "--traffic",
            "viral",
            "--catalog",
            catalog.to_str().unwrap(),
            "--format",
            "json",
        ],
    );
    assert!(!output.status.success());

    let err: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(err["code"], "no_capacity_match");
}

#[test]
fn test_offline_unknown_app_type_is_invalid_input() {
    let dir = TempDir::new().unwrap();
    let catalog = build_catalog(&dir);

    let output = ia(
        dir.path(),
        &[
            "recommend",
            "spaceship",
            "--catalog",
            catalog.to_str().unwrap(),
            "--format",
            "json",
        ],
    );
    assert!(!output.status.success());

    let err: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(err["code"], "invalid_input");
}

#[test]
fn test_rules_show_json() {
    let dir = TempDir::new().unwrap();
    let output = ia(dir.path(), &["rules", "show", "--format", "json"]);
    assert!(output.status.success());

    let rules: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(rules["archetypes"]["ecommerce"]["base_ram"], 4.0);
    assert_eq!(rules["services"].as_array().unwrap().len(), 5);
}

#[test]
fn test_config_file_sets_default_format() {
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().join(".config").join("ia");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.json"), r#"{"default_format": "json"}"#).unwrap();

    let output = ia(dir.path(), &["rules", "show"]);
    assert!(output.status.success());
    assert!(serde_json::from_str::<Value>(&stdout(&output)).is_ok());
}
