//! Tests for connection.rs - Connection lifecycle
//!
//! These tests verify open/close state transitions, that the connector sees the
//! target derived from the credentials, and the scoped cursor helper.

// Allow unwrap() in tests for cleaner test code
#![allow(clippy::unwrap_used)]

use super::test_utils::{id_name_table, sample_credentials, MockServer};
use crate::connection::Connection;
use crate::constants::{CURRENT_CATALOG_OPTION, CURRENT_DB_SCHEMA_OPTION};
use crate::credentials::AuthOption;
use crate::error::AdapterError;
use crate::models::{ConnectionState, Value};

#[test]
fn test_new_connection_is_init() {
    let conn = Connection::new("model.orders", sample_credentials());

    assert_eq!(conn.name(), "model.orders");
    assert_eq!(conn.state(), ConnectionState::Init);
    assert_eq!(conn.credentials().host(), "test.altertable.ai");
}

#[test]
fn test_open_passes_target_to_connector() {
    let server = MockServer::new();
    let mut conn = Connection::new("test", sample_credentials());

    conn.open(&server).unwrap();

    let target = server.last_target().unwrap();
    assert_eq!(target.uri(), "grpc://test.altertable.ai:15002");
    assert_eq!(target.auth_option(AuthOption::Username), Some("test_user"));
    assert_eq!(
        target.transport_options().get(CURRENT_CATALOG_OPTION).map(String::as_str),
        Some("test_db")
    );
    assert_eq!(
        target.transport_options().get(CURRENT_DB_SCHEMA_OPTION).map(String::as_str),
        Some("test_schema")
    );
    assert_eq!(conn.state(), ConnectionState::Open);
}

#[test]
fn test_open_twice_connects_once() {
    let server = MockServer::new();
    let mut conn = Connection::new("test", sample_credentials());

    conn.open(&server).unwrap();
    conn.open(&server).unwrap();

    assert_eq!(server.connect_count(), 1);
    assert_eq!(conn.state(), ConnectionState::Open);
}

#[test]
fn test_open_failure_sets_fail_state() {
    let server = MockServer::new();
    server.fail_next_connects(1);
    let mut conn = Connection::new("test", sample_credentials());

    let err = conn.open(&server).unwrap_err();

    match err {
        AdapterError::ConnectionFailure { uri, source } => {
            assert_eq!(uri, "grpc://test.altertable.ai:15002");
            assert!(source.to_string().contains("connection refused"));
        }
        other => panic!("Expected ConnectionFailure, got {other:?}"),
    }
    assert_eq!(conn.state(), ConnectionState::Fail);
    assert_eq!(server.connect_count(), 1);
}

#[test]
fn test_open_after_failure_reconnects() {
    let server = MockServer::new();
    server.fail_next_connects(1);
    let mut conn = Connection::new("test", sample_credentials());

    assert!(conn.open(&server).is_err());
    conn.open(&server).unwrap();

    assert_eq!(conn.state(), ConnectionState::Open);
    assert_eq!(server.connect_count(), 2);
}

#[test]
fn test_close_is_idempotent() {
    let server = MockServer::new();
    let mut conn = Connection::new("test", sample_credentials());
    conn.open(&server).unwrap();

    conn.close().unwrap();
    conn.close().unwrap();

    assert_eq!(conn.state(), ConnectionState::Closed);
    assert_eq!(server.close_count(), 1);
}

#[test]
fn test_close_unopened_connection() {
    let mut conn = Connection::new("test", sample_credentials());

    conn.close().unwrap();

    assert_eq!(conn.state(), ConnectionState::Closed);
}

#[test]
fn test_reopen_after_close() {
    let server = MockServer::new();
    let mut conn = Connection::new("test", sample_credentials());

    conn.open(&server).unwrap();
    conn.close().unwrap();
    conn.open(&server).unwrap();

    assert_eq!(conn.state(), ConnectionState::Open);
    assert_eq!(server.connect_count(), 2);
}

#[test]
fn test_cursors_share_the_client() {
    let sql = "SELECT id, name FROM t";
    let server = MockServer::new().with_table(sql, id_name_table(&[(1, "a")]));
    let mut conn = Connection::new("test", sample_credentials());
    conn.open(&server).unwrap();

    let mut first = conn.cursor();
    let mut second = conn.cursor();
    assert_ne!(first.id(), second.id());

    first.execute(sql, None).unwrap();
    second.execute(sql, None).unwrap();

    assert_eq!(first.rowcount(), 1);
    assert_eq!(second.rowcount(), 1);
    assert_eq!(server.connect_count(), 1);
}

#[test]
fn test_with_cursor_returns_closure_result() {
    let sql = "SELECT id, name FROM t";
    let server = MockServer::new().with_table(sql, id_name_table(&[(1, "a"), (2, "b")]));
    let mut conn = Connection::new("test", sample_credentials());
    conn.open(&server).unwrap();

    let first = conn
        .with_cursor(|cursor| Ok(cursor.execute(sql, None)?.fetch_one()))
        .unwrap();

    assert_eq!(
        first,
        Some(vec![Value::Integer(1), Value::Text("a".to_string())])
    );
}

#[test]
fn test_with_cursor_propagates_errors() {
    let server = MockServer::new().with_failure("SELECT boom", "boom");
    let mut conn = Connection::new("test", sample_credentials());
    conn.open(&server).unwrap();

    let result = conn.with_cursor(|cursor| cursor.execute("SELECT boom", None).map(|_| ()));

    assert!(matches!(result, Err(AdapterError::Execution { .. })));
    assert_eq!(conn.state(), ConnectionState::Open);
}

#[test]
fn test_transaction_hooks_are_noops() {
    let server = MockServer::new();
    let mut conn = Connection::new("test", sample_credentials());
    conn.open(&server).unwrap();

    conn.commit().unwrap();
    conn.rollback().unwrap();
    conn.cancel();

    assert_eq!(conn.state(), ConnectionState::Open);
    assert!(server.executed().is_empty());
}

#[test]
fn test_debug_hides_password() {
    let conn = Connection::new("test", sample_credentials());
    let rendered = format!("{conn:?}");

    assert!(rendered.contains("test_user"));
    assert!(!rendered.contains("test_password"));
}
