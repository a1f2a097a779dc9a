/// Connection lifecycle management for Altertable
///
/// This module handles opening the transport client from credentials, handing
/// out cursors that share it, and closing it. The transport always runs in
/// autocommit mode, so transaction boundaries and cancellation are inert.
use std::sync::{Arc, Mutex};
use tracing::{debug, info_span, warn, Span};
use uuid::Uuid;

use crate::credentials::Credentials;
use crate::cursor::Cursor;
use crate::error::{AdapterError, Result};
use crate::models::ConnectionState;
use crate::transport::{Connector, SharedClient};
use crate::utils::safe_lock_arc;

/// One logical session with the remote database
pub struct Connection {
    name: String,
    credentials: Credentials,
    state: ConnectionState,
    client: SharedClient,
    span: Span,
}

impl Connection {
    /// A connection in the `Init` state; nothing is contacted until `open`.
    pub fn new(name: impl Into<String>, credentials: Credentials) -> Self {
        let name = name.into();
        let conn_id = Uuid::new_v4().to_string();
        let span = info_span!("altertable.connection", name = %name, conn_id = %conn_id);

        Self {
            name,
            credentials,
            state: ConnectionState::Init,
            client: Arc::new(Mutex::new(None)),
            span,
        }
    }

    /// Log under `span` instead of the connection's own span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Establish the transport client.
    ///
    /// An already open connection is returned unchanged without contacting the
    /// connector. Otherwise the credentials are resolved into a target and the
    /// connector is called exactly once; there is no retry at this level.
    ///
    /// # Arguments
    /// - `connector`: Transport used to reach the target
    ///
    /// Returns the connection on success. On failure the state becomes `Fail`
    /// and `ConnectionFailure` is returned.
    pub fn open(&mut self, connector: &dyn Connector) -> Result<&mut Self> {
        let span = self.span.clone();
        let _entered = span.enter();

        if self.state == ConnectionState::Open {
            debug!("Connection is already open, skipping open");
            return Ok(self);
        }

        let target = self.credentials.build_target();
        debug!(uri = target.uri(), "Opening connection");

        match connector.connect(&target) {
            Ok(client) => {
                *safe_lock_arc(&self.client, "open client")? = Some(client);
                self.state = ConnectionState::Open;
                Ok(self)
            }
            Err(source) => {
                self.state = ConnectionState::Fail;
                Err(AdapterError::ConnectionFailure {
                    uri: target.uri().to_string(),
                    source,
                })
            }
        }
    }

    /// A new cursor sharing this connection's transport client.
    ///
    /// Always succeeds; executing on the cursor fails with `ConnectionClosed`
    /// while the connection is not open.
    pub fn cursor(&self) -> Cursor {
        let cursor = Cursor::new(self.client.clone(), &self.span);
        self.span.in_scope(|| debug!(cursor_id = cursor.id(), "Created cursor"));
        cursor
    }

    /// Run `f` with a fresh cursor that is closed on every exit path.
    pub fn with_cursor<T>(&self, f: impl FnOnce(&mut Cursor) -> Result<T>) -> Result<T> {
        let mut cursor = self.cursor();
        let result = f(&mut cursor);
        cursor.close();
        result
    }

    /// Release the transport client. Closing twice is fine.
    ///
    /// A transport error while closing is logged and otherwise ignored.
    pub fn close(&mut self) -> Result<()> {
        let _entered = self.span.enter();

        let client = safe_lock_arc(&self.client, "close client")?.take();
        if let Some(mut client) = client {
            if let Err(e) = client.close() {
                warn!(error = %e, "Error closing transport client");
            }
            debug!("Connection closed");
        }

        self.state = ConnectionState::Closed;
        Ok(())
    }

    /// No-op: the transport runs in autocommit mode.
    pub fn commit(&self) -> Result<()> {
        self.span.in_scope(|| debug!("Commit is a no-op in autocommit mode"));
        Ok(())
    }

    /// No-op: the transport runs in autocommit mode.
    pub fn rollback(&self) -> Result<()> {
        self.span.in_scope(|| debug!("Rollback is a no-op in autocommit mode"));
        Ok(())
    }

    /// Best-effort cancel hook. Only logs; running statements are not interrupted.
    pub fn cancel(&self) {
        self.span
            .in_scope(|| debug!("Attempting to cancel connection: {}", self.name));
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("name", &self.name)
            .field("credentials", &self.credentials)
            .field("state", &self.state)
            .finish()
    }
}
