//! End-to-end tests for the four procedures, dispatched through the
//! registry with JSON inputs the way a transport would deliver them.

use logvault_core::Error;
use logvault_rpc::{register_all, ProcedureRegistry};
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

fn registry() -> ProcedureRegistry {
    logvault_core::logging::init_test();
    let mut registry = ProcedureRegistry::new();
    register_all(&mut registry).unwrap();
    registry
}

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("cli.db")
}

/// Store one entry and return its id.
async fn store(registry: &ProcedureRegistry, path: &PathBuf, mut fields: Value) -> i64 {
    fields["dbPath"] = json!(path);
    let out = registry.call("logs.store", fields).await.unwrap();
    out["id"].as_i64().unwrap()
}

/// Insert an entry with an explicit timestamp, bypassing the column default
/// so ordering tests are deterministic.
async fn store_at(registry: &ProcedureRegistry, path: &PathBuf, ts: &str, message: &str) {
    // Create the table first, then insert through db.execute
    registry
        .call("logs.query", json!({"dbPath": path}))
        .await
        .unwrap();
    let out = registry
        .call(
            "db.execute",
            json!({
                "sql": "INSERT INTO logs (timestamp, level, message) VALUES (?, 'info', ?)",
                "params": [ts, message],
                "dbPath": path,
            }),
        )
        .await
        .unwrap();
    assert_eq!(out["changes"], json!(1));
}

#[tokio::test]
async fn test_registration_surface() {
    let registry = registry();
    assert_eq!(
        registry.paths(),
        vec!["db.execute", "db.query", "logs.query", "logs.store"]
    );
    assert!(registry.description("logs.store").is_some());

    // Registering again collides on every path
    let mut registry = registry;
    let err = register_all(&mut registry);
    assert!(matches!(err, Err(Error::DuplicateProcedure(_))));
}

#[tokio::test]
async fn test_store_then_query_every_valid_level() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let registry = registry();

    for level in ["trace", "debug", "info", "warn", "error"] {
        let id = store(
            &registry,
            &path,
            json!({"level": level, "message": format!("m-{level}")}),
        )
        .await;
        assert!(id > 0);
    }

    let out = registry
        .call("logs.query", json!({"dbPath": path}))
        .await
        .unwrap();
    let logs = out["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 5);
    for level in ["trace", "debug", "info", "warn", "error"] {
        assert!(logs
            .iter()
            .any(|l| l["level"] == json!(level) && l["message"] == json!(format!("m-{level}"))));
    }
    // The output shape carries no total field
    assert!(out.get("total").is_none());
}

#[tokio::test]
async fn test_invalid_level_rejected_before_any_write() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let registry = registry();

    let err = registry
        .call(
            "logs.store",
            json!({"level": "bogus", "message": "m", "dbPath": path}),
        )
        .await;
    assert!(matches!(err, Err(Error::InvalidLevel(level)) if level == "bogus"));

    // Rejected before table-ensure: the database file was never created
    assert!(!path.exists());
}

#[tokio::test]
async fn test_data_round_trip_and_null_marker() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let registry = registry();

    store(
        &registry,
        &path,
        json!({"level": "info", "message": "with data", "data": {"a": 1, "b": "x"}}),
    )
    .await;
    store(
        &registry,
        &path,
        json!({"level": "info", "message": "without data"}),
    )
    .await;
    store(
        &registry,
        &path,
        json!({"level": "info", "message": "empty data", "data": {}}),
    )
    .await;

    let out = registry
        .call("logs.query", json!({"dbPath": path}))
        .await
        .unwrap();
    let logs = out["logs"].as_array().unwrap();

    let find = |msg: &str| logs.iter().find(|l| l["message"] == json!(msg)).unwrap();
    assert_eq!(find("with data")["data"], json!({"a": 1, "b": "x"}));
    assert_eq!(find("without data")["data"], Value::Null);
    assert_eq!(find("empty data")["data"], json!({}));
}

#[tokio::test]
async fn test_data_must_be_a_mapping() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let registry = registry();

    let err = registry
        .call(
            "logs.store",
            json!({"level": "info", "message": "m", "data": [1, 2, 3], "dbPath": path}),
        )
        .await;
    assert!(matches!(err, Err(Error::InvalidInput(_))));
}

#[tokio::test]
async fn test_level_set_filter() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let registry = registry();

    for level in ["trace", "debug", "info", "warn", "error"] {
        store(&registry, &path, json!({"level": level, "message": "m"})).await;
    }

    let out = registry
        .call(
            "logs.query",
            json!({"level": ["warn", "error"], "dbPath": path}),
        )
        .await
        .unwrap();
    let logs = out["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs
        .iter()
        .all(|l| l["level"] == json!("warn") || l["level"] == json!("error")));

    // Single level is a one-element membership set
    let out = registry
        .call("logs.query", json!({"level": "debug", "dbPath": path}))
        .await
        .unwrap();
    assert_eq!(out["logs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_session_and_command_filters_conjoin() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let registry = registry();

    store(
        &registry,
        &path,
        json!({"level": "info", "message": "hit", "sessionId": "s1", "command": "sync"}),
    )
    .await;
    store(
        &registry,
        &path,
        json!({"level": "info", "message": "miss", "sessionId": "s1", "command": "status"}),
    )
    .await;
    store(
        &registry,
        &path,
        json!({"level": "info", "message": "miss", "sessionId": "s2", "command": "sync"}),
    )
    .await;

    let out = registry
        .call(
            "logs.query",
            json!({"sessionId": "s1", "command": "sync", "dbPath": path}),
        )
        .await
        .unwrap();
    let logs = out["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["message"], json!("hit"));
    assert_eq!(logs[0]["sessionId"], json!("s1"));
}

#[tokio::test]
async fn test_order_by_direction() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let registry = registry();

    store_at(&registry, &path, "2026-01-01 00:00:01", "old").await;
    store_at(&registry, &path, "2026-01-01 00:00:02", "new").await;

    let desc = registry
        .call("logs.query", json!({"dbPath": path}))
        .await
        .unwrap();
    assert_eq!(desc["logs"][0]["message"], json!("new"));

    let asc = registry
        .call("logs.query", json!({"orderBy": "asc", "dbPath": path}))
        .await
        .unwrap();
    assert_eq!(asc["logs"][0]["message"], json!("old"));
}

#[tokio::test]
async fn test_order_by_is_strictly_typed() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let registry = registry();

    let err = registry
        .call("logs.query", json!({"orderBy": "upwards", "dbPath": path}))
        .await;
    assert!(matches!(err, Err(Error::InvalidInput(_))));
}

#[tokio::test]
async fn test_limit_offset_pagination() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let registry = registry();

    for i in 1..=5 {
        store_at(
            &registry,
            &path,
            &format!("2026-01-01 00:00:0{i}"),
            &format!("m{i}"),
        )
        .await;
    }

    let out = registry
        .call(
            "logs.query",
            json!({"limit": 2, "offset": 1, "dbPath": path}),
        )
        .await
        .unwrap();
    let logs = out["logs"].as_array().unwrap();

    // Default desc ranks m5 first; offset 1 limit 2 gives ranks 2 and 3
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["message"], json!("m4"));
    assert_eq!(logs[1]["message"], json!("m3"));
}

#[tokio::test]
async fn test_db_execute_delete_reports_changes() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let registry = registry();

    store(&registry, &path, json!({"level": "debug", "message": "d1"})).await;
    store(&registry, &path, json!({"level": "debug", "message": "d2"})).await;
    store(&registry, &path, json!({"level": "warn", "message": "w"})).await;

    let out = registry
        .call(
            "db.execute",
            json!({
                "sql": "DELETE FROM logs WHERE level = ?",
                "params": ["debug"],
                "dbPath": path,
            }),
        )
        .await
        .unwrap();
    assert_eq!(out["changes"], json!(2));

    let remaining = registry
        .call("logs.query", json!({"dbPath": path}))
        .await
        .unwrap();
    assert_eq!(remaining["logs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_db_query_returns_columns_and_rows_verbatim() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let registry = registry();

    store(
        &registry,
        &path,
        json!({"level": "info", "message": "raw", "sessionId": "s1"}),
    )
    .await;

    let out = registry
        .call(
            "db.query",
            json!({
                "sql": "SELECT message, session_id FROM logs WHERE level = ?",
                "params": ["info"],
                "dbPath": path,
            }),
        )
        .await
        .unwrap();
    assert_eq!(out["columns"], json!(["message", "session_id"]));
    assert_eq!(out["rows"][0]["message"], json!("raw"));
    assert_eq!(out["rows"][0]["session_id"], json!("s1"));
}

#[tokio::test]
async fn test_db_query_propagates_engine_errors() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let registry = registry();

    let err = registry
        .call(
            "db.query",
            json!({"sql": "SELECT * FROM missing", "dbPath": path}),
        )
        .await;
    assert!(matches!(err, Err(Error::Database(_))));
}

#[tokio::test]
async fn test_store_on_fresh_file_needs_no_schema_call() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let registry = registry();

    assert!(!path.exists());
    let id = store(
        &registry,
        &path,
        json!({"level": "info", "message": "first"}),
    )
    .await;
    assert_eq!(id, 1);
    assert!(path.exists());
}
