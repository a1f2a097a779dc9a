//! Tests for constants.rs - Defaults and the global runtime

use crate::constants::*;

#[test]
fn test_connection_defaults() {
    assert_eq!(DEFAULT_HOST, "flight.altertable.ai");
    assert_eq!(DEFAULT_PORT, 443);
    assert!(DEFAULT_TLS);
    assert_eq!(DEFAULT_CONNECT_TIMEOUT_SECS, 30);
}

#[test]
fn test_option_keys() {
    assert_eq!(USERNAME_OPTION, "username");
    assert_eq!(PASSWORD_OPTION, "password");
    assert_eq!(CURRENT_CATALOG_OPTION, "adbc.connection.catalog");
    assert_eq!(CURRENT_DB_SCHEMA_OPTION, "adbc.connection.db_schema");
}

#[test]
fn test_runtime_drives_futures() {
    let value = TOKIO_RUNTIME.block_on(async { 40 + 2 });
    assert_eq!(value, 42);
}
