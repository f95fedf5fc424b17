//! CLI integration tests for equiptrack
//!
//! Tests the equiptrack CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Command isolated from the user's configuration and environment
#[allow(deprecated)]
fn equiptrack_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("equiptrack").unwrap();
    cmd.current_dir(temp_dir.path());
    cmd.env("EQUIPTRACK_CONFIG_DIR", temp_dir.path().join("config"));
    cmd.env_remove("EQUIPTRACK_BIND");
    cmd.env_remove("EQUIPTRACK_DATABASE");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn database_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("data").join("inventory.db")
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_migrate_creates_database() {
    let temp_dir = TempDir::new().unwrap();
    let db = database_path(&temp_dir);

    equiptrack_cmd(&temp_dir)
        .arg("--database")
        .arg(&db)
        .arg("migrate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Migrated schema from version 0 to 4"));

    assert!(db.exists(), "Database file should exist");

    equiptrack_cmd(&temp_dir)
        .arg("--database")
        .arg(&db)
        .arg("migrate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema is up to date (version 4)"));
}

#[test]
fn test_migrate_json_status() {
    let temp_dir = TempDir::new().unwrap();
    let status = json_output(
        equiptrack_cmd(&temp_dir)
            .arg("--database")
            .arg(database_path(&temp_dir))
            .args(["--format", "json", "migrate"]),
    );

    assert_eq!(status["current_version"], 4);
    assert_eq!(status["target_version"], 4);
    assert_eq!(status["needs_migration"], false);
}

#[test]
fn test_optimize_empty_inventory() {
    let temp_dir = TempDir::new().unwrap();
    let report = json_output(
        equiptrack_cmd(&temp_dir)
            .arg("--database")
            .arg(database_path(&temp_dir))
            .args(["--format", "json", "optimize"]),
    );

    assert_eq!(report["total_equipment"], 0);
    assert_eq!(report["equipment_with_search_vectors"], 0);
    assert_eq!(report["optimization_percentage"], 0.0);
}

#[test]
fn test_reindex_requires_ids() {
    let temp_dir = TempDir::new().unwrap();

    equiptrack_cmd(&temp_dir)
        .arg("--database")
        .arg(database_path(&temp_dir))
        .arg("reindex")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one id"));
}

#[test]
fn test_reindex_rejects_oversized_batch() {
    let temp_dir = TempDir::new().unwrap();
    let ids: Vec<String> = (1..=101).map(|id| id.to_string()).collect();

    equiptrack_cmd(&temp_dir)
        .arg("--database")
        .arg(database_path(&temp_dir))
        .arg("reindex")
        .args(&ids)
        .assert()
        .failure()
        .stderr(predicate::str::contains("at most 100"));
}

#[test]
fn test_reindex_reports_missing_ids() {
    let temp_dir = TempDir::new().unwrap();
    let report = json_output(
        equiptrack_cmd(&temp_dir)
            .arg("--database")
            .arg(database_path(&temp_dir))
            .args(["--format", "json", "reindex", "41", "42"]),
    );

    assert_eq!(report["updated_count"], 0);
    assert_eq!(report["failed_count"], 2);
    assert_eq!(report["total_processed"], 2);
    assert_eq!(report["failures"][0]["equipment_id"], 41);
}

#[test]
fn test_analytics_text_output() {
    let temp_dir = TempDir::new().unwrap();

    equiptrack_cmd(&temp_dir)
        .arg("--database")
        .arg(database_path(&temp_dir))
        .arg("analytics")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total equipment: 0"))
        .stdout(predicate::str::contains("Excellent"));
}

#[test]
fn test_analytics_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let analytics = json_output(
        equiptrack_cmd(&temp_dir)
            .arg("--database")
            .arg(database_path(&temp_dir))
            .args(["--format", "json", "analytics"]),
    );

    assert_eq!(analytics["total_equipment"], 0);
    assert_eq!(analytics["condition_distribution"]["Poor"], 0);
    assert_eq!(analytics["search_vector_coverage"], 0.0);
}

#[test]
fn test_config_defaults() {
    let temp_dir = TempDir::new().unwrap();

    equiptrack_cmd(&temp_dir)
        .args(["config", "get", "server.bind"])
        .assert()
        .success()
        .stdout(predicate::str::contains("127.0.0.1:8000"));
}

#[test]
fn test_config_set_and_get() {
    let temp_dir = TempDir::new().unwrap();

    equiptrack_cmd(&temp_dir)
        .args(["config", "set", "database.max_connections", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set database.max_connections = 9"));

    assert!(temp_dir.path().join("config").join("config.toml").exists());

    equiptrack_cmd(&temp_dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("database.max_connections = 9"));
}

#[test]
fn test_config_environment_override() {
    let temp_dir = TempDir::new().unwrap();

    equiptrack_cmd(&temp_dir)
        .env("EQUIPTRACK_BIND", "0.0.0.0:9100")
        .args(["config", "get", "server.bind"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.0.0.0:9100"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let temp_dir = TempDir::new().unwrap();

    equiptrack_cmd(&temp_dir)
        .args(["config", "set", "llm.model", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_help_lists_commands() {
    let temp_dir = TempDir::new().unwrap();

    equiptrack_cmd(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("reindex"))
        .stdout(predicate::str::contains("optimize"));
}
