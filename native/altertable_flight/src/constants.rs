/// Global constants for altertable_flight
///
/// This module holds the connection defaults, URI schemes, transport option keys
/// and the process-wide Tokio runtime used to drive the Flight SQL client.
use once_cell::sync::Lazy;
use tokio::runtime::Runtime;

/// Adapter type name reported to the host framework
pub const ADAPTER_TYPE: &str = "altertable";

/// Default Flight SQL endpoint host
pub const DEFAULT_HOST: &str = "flight.altertable.ai";

/// Default Flight SQL endpoint port
pub const DEFAULT_PORT: u16 = 443;

/// Transport security is on unless explicitly disabled
pub const DEFAULT_TLS: bool = true;

/// URI scheme for TLS-secured gRPC endpoints
pub const SECURE_SCHEME: &str = "grpc+tls";

/// URI scheme for plaintext gRPC endpoints
pub const PLAIN_SCHEME: &str = "grpc";

/// Auth option key carrying the user name
pub const USERNAME_OPTION: &str = "username";

/// Auth option key carrying the password
pub const PASSWORD_OPTION: &str = "password";

/// Connection option key selecting the current catalog (database)
pub const CURRENT_CATALOG_OPTION: &str = "adbc.connection.catalog";

/// Connection option key selecting the current schema
pub const CURRENT_DB_SCHEMA_OPTION: &str = "adbc.connection.db_schema";

/// Status message attached to every statement response
pub const RESPONSE_OK: &str = "OK";

/// Current-timestamp function in the Altertable SQL dialect
pub const DATE_FUNCTION: &str = "now()";

/// Row count reported before any statement has run
pub const UNKNOWN_ROWCOUNT: i64 = -1;

/// Batch size used by `fetch_many` when none is given
pub const DEFAULT_FETCH_SIZE: usize = 1;

/// Timeout for establishing the Flight SQL channel (in seconds)
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Global Tokio runtime for async operations
///
/// The public API is blocking; the Flight SQL client is driven to completion on
/// this runtime with `block_on`. Calling into the transport from inside another
/// async task will panic, so host code must stay on plain threads.
///
/// Runtime creation only fails when the system cannot spawn threads.
#[allow(clippy::expect_used)]
pub static TOKIO_RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    Runtime::new()
        .expect("Failed to initialize Tokio runtime - check system resources and thread limits")
});
