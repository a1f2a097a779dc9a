/// Transport client boundary
///
/// These traits describe what the adapter needs from a database client: connect
/// to a target, run a statement directly or through a prepared statement, and
/// pull the whole columnar result into memory. The Flight SQL client in
/// [`crate::flight`] implements them for real servers; tests script them in
/// memory.
use std::sync::{Arc, Mutex};

use crate::credentials::ConnectionTarget;
use crate::error::TransportError;
use crate::models::{Parameters, ResultTable};

/// Opens transport clients against a connection target
pub trait Connector: Send + Sync {
    /// Network handshake and authentication.
    fn connect(&self, target: &ConnectionTarget)
        -> Result<Box<dyn TransportClient>, TransportError>;
}

/// An authenticated session with the remote database
///
/// Clients are used by one statement at a time; callers serialize access
/// through [`SharedClient`].
pub trait TransportClient: Send {
    /// Run `sql` without parameters.
    fn query(&mut self, sql: &str) -> Result<Box<dyn ResultReader>, TransportError>;

    /// Prepare `sql` for execution with bound parameters.
    fn prepare(&mut self, sql: &str) -> Result<Box<dyn PreparedQuery>, TransportError>;

    /// Release the session.
    fn close(&mut self) -> Result<(), TransportError>;
}

/// A server-side prepared statement
pub trait PreparedQuery: Send {
    /// Bind `parameters` and run the statement.
    fn query(&mut self, parameters: &Parameters) -> Result<Box<dyn ResultReader>, TransportError>;
}

/// A pending statement result
pub trait ResultReader: Send {
    /// Pull the entire columnar result into memory.
    fn read_all(self: Box<Self>) -> Result<ResultTable, TransportError>;
}

/// Transport client slot shared by a connection and its cursors
///
/// `None` until the connection opens and again after it closes. Only the
/// connection puts a client in or takes it out.
pub type SharedClient = Arc<Mutex<Option<Box<dyn TransportClient>>>>;
