/// Host-facing connection manager
///
/// This module is the adapter's surface towards the host framework:
/// - Opening connections with the host retry policy (one retry, squared backoff)
/// - Executing statements and returning a status response with the rows
/// - Logging the failing SQL for every execution error
/// - Forwarding cancel and close requests
use std::thread;
use tracing::{debug, error, warn};

use crate::connection::Connection;
use crate::constants::{ADAPTER_TYPE, DATE_FUNCTION};
use crate::cursor::Cursor;
use crate::error::Result;
use crate::flight::FlightSqlConnector;
use crate::models::{AdapterResponse, ConnectionState, Parameters, Row};
use crate::retry::RetryPolicy;
use crate::transport::Connector;

/// Opens, runs statements on, and closes Altertable connections
#[derive(Debug, Clone)]
pub struct ConnectionManager<C: Connector = FlightSqlConnector> {
    connector: C,
    retry: RetryPolicy,
}

impl ConnectionManager<FlightSqlConnector> {
    /// Manager backed by the Arrow Flight SQL transport.
    pub fn flight() -> Self {
        Self::new(FlightSqlConnector::new())
    }
}

impl<C: Connector> ConnectionManager<C> {
    /// Adapter type name
    pub const TYPE: &'static str = ADAPTER_TYPE;

    pub fn new(connector: C) -> Self {
        Self {
            connector,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// SQL expression for the current timestamp.
    pub fn date_function() -> &'static str {
        DATE_FUNCTION
    }

    /// Open `connection`, retrying failed attempts per the retry policy.
    ///
    /// An open connection is returned as is. Every error is retryable; once the
    /// retries are used up the last `ConnectionFailure` is returned and the
    /// connection is left in the `Fail` state.
    pub fn open<'a>(&self, connection: &'a mut Connection) -> Result<&'a mut Connection> {
        if connection.state() == ConnectionState::Open {
            connection
                .span()
                .in_scope(|| debug!("Connection is already open, skipping open"));
            return Ok(connection);
        }

        let mut attempt: u32 = 0;
        loop {
            let result = connection.open(&self.connector).map(|_| ());

            match result {
                Ok(()) => return Ok(connection),
                Err(e) if attempt < self.retry.retry_limit => {
                    let backoff = self.retry.backoff(attempt);
                    connection.span().in_scope(|| {
                        warn!(
                            "Got a retryable error when attempting to open a connection ({}/{}): {e}. Retrying in {backoff:?}",
                            attempt + 1,
                            self.retry.retry_limit,
                        );
                    });
                    if !backoff.is_zero() {
                        thread::sleep(backoff);
                    }
                    attempt += 1;
                }
                Err(e) => {
                    connection.span().in_scope(|| {
                        error!("Got an error when attempting to open a connection: '{e}'");
                    });
                    return Err(e);
                }
            }
        }
    }

    /// Run one statement and return the status response.
    ///
    /// The connection is opened first if needed. The statement runs on a scoped
    /// cursor that is closed afterwards; with `fetch` every result row is
    /// returned as well, otherwise the row vector is empty.
    ///
    /// # Arguments
    /// - `connection`: Connection to run on
    /// - `sql`: SQL statement text
    /// - `parameters`: Optional statement parameters
    /// - `fetch`: Whether to return the result rows
    pub fn execute(
        &self,
        connection: &mut Connection,
        sql: &str,
        parameters: Option<&Parameters>,
        fetch: bool,
    ) -> Result<(AdapterResponse, Vec<Row>)> {
        self.open(connection)?;

        let result = connection.with_cursor(|cursor| {
            cursor.execute(sql, parameters)?;
            let response = Self::get_response(cursor);
            let rows = if fetch { cursor.fetch_all() } else { Vec::new() };
            Ok((response, rows))
        });

        Self::exception_handler(connection, sql, result)
    }

    /// Status response for the statement last run on `cursor`.
    pub fn get_response(cursor: &Cursor) -> AdapterResponse {
        AdapterResponse::ok(cursor.rowcount())
    }

    /// Best-effort cancel; see [`Connection::cancel`].
    pub fn cancel(&self, connection: &Connection) {
        connection.cancel();
    }

    pub fn close(&self, connection: &mut Connection) -> Result<()> {
        connection.close()
    }

    fn exception_handler<T>(connection: &Connection, sql: &str, result: Result<T>) -> Result<T> {
        if result.is_err() {
            connection
                .span()
                .in_scope(|| error!("Error executing SQL: {sql}"));
        }
        result
    }
}
