//! `altertable_flight`: Altertable database adapter over Arrow Flight SQL
//!
//! This is the root module of the adapter library. It declares the submodules
//! for credentials, connections, cursors and the transport, and re-exports the
//! types host code works with.
pub mod connection;
pub mod constants;
pub mod credentials;
pub mod cursor;
pub mod decode;
pub mod error;
pub mod flight;
pub mod manager;
pub mod models;
pub mod retry;
pub mod statement;
pub mod transport;
pub mod utils;

// Re-export key types for host code
pub use connection::Connection;
pub use constants::*;
pub use credentials::{ConnectionTarget, Credentials, CredentialsConfig};
pub use cursor::Cursor;
pub use error::{AdapterError, Result, TransportError};
pub use flight::FlightSqlConnector;
pub use manager::ConnectionManager;
pub use models::*;
pub use retry::RetryPolicy;
pub use transport::{Connector, PreparedQuery, ResultReader, TransportClient};

#[cfg(test)]
mod tests;
