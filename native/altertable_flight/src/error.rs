//! Error types for adapter operations

use thiserror::Error;

/// Error raised by a transport client, passed through untranslated
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Errors surfaced by credentials, connections and cursors
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Malformed credential fields, raised at construction and never retried
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The transport client could not connect to the target
    #[error("failed to connect to {uri}: {source}")]
    ConnectionFailure {
        uri: String,
        #[source]
        source: TransportError,
    },

    /// Statement execution or result materialization failed
    #[error("Runtime Error: {source}")]
    Execution {
        /// The statement that failed
        sql: String,
        #[source]
        source: TransportError,
    },

    /// A cursor was used while its connection had no open transport client
    #[error("connection is closed")]
    ConnectionClosed,

    /// The shared transport slot was poisoned by a panicking holder
    #[error("mutex poisoned in {0}")]
    LockPoisoned(String),
}

impl AdapterError {
    /// Wrap a transport or materialization error with the failing statement.
    pub fn execution(sql: &str, source: impl Into<TransportError>) -> Self {
        AdapterError::Execution {
            sql: sql.to_string(),
            source: source.into(),
        }
    }

    /// The failing SQL text, for execution errors.
    pub fn sql(&self) -> Option<&str> {
        match self {
            AdapterError::Execution { sql, .. } => Some(sql),
            _ => None,
        }
    }
}
