/// Arrow Flight SQL transport
///
/// This module implements the transport boundary on top of the `arrow-flight`
/// Flight SQL client:
/// - Connecting a gRPC channel to `grpc://` or `grpc+tls://` targets
/// - Basic-auth handshake with the target's username and password
/// - Running statements and prepared statements into `FlightInfo`s
/// - Redeeming every endpoint ticket with `DoGet` to build the result table
///
/// All calls block on the global Tokio runtime. Connection establishment is
/// bounded by `DEFAULT_CONNECT_TIMEOUT_SECS`; statements inherit the server's
/// own timeouts.
use arrow_array::RecordBatch;
use arrow_flight::sql::client::{FlightSqlServiceClient, PreparedStatement};
use arrow_flight::FlightInfo;
use arrow_schema::{Schema, SchemaRef};
use futures::TryStreamExt;
use std::sync::Arc;
use std::time::Duration;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tracing::debug;

use crate::constants::*;
use crate::credentials::{AuthOption, ConnectionTarget};
use crate::error::TransportError;
use crate::models::{Parameters, ResultTable};
use crate::statement::bind_parameters;
use crate::transport::{Connector, PreparedQuery, ResultReader, TransportClient};

/// Opens Flight SQL sessions
#[derive(Debug, Clone)]
pub struct FlightSqlConnector {
    connect_timeout: Duration,
}

impl Default for FlightSqlConnector {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl FlightSqlConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Connector for FlightSqlConnector {
    fn connect(
        &self,
        target: &ConnectionTarget,
    ) -> Result<Box<dyn TransportClient>, TransportError> {
        let timeout = self.connect_timeout;

        TOKIO_RUNTIME.block_on(async {
            let client = tokio::time::timeout(timeout, FlightSqlTransport::connect(target))
                .await
                .map_err(|_| format!("Connection timeout after {} seconds", timeout.as_secs()))??;
            Ok::<Box<dyn TransportClient>, TransportError>(Box::new(client))
        })
    }
}

/// Translate a `grpc[+tls]://` target URI into the channel endpoint URI.
///
/// Returns the HTTP URI and whether TLS is required.
pub fn endpoint_uri(uri: &str) -> Result<(String, bool), TransportError> {
    let secure_prefix = format!("{SECURE_SCHEME}://");
    let plain_prefix = format!("{PLAIN_SCHEME}://");

    if let Some(authority) = uri.strip_prefix(&secure_prefix) {
        Ok((format!("https://{authority}"), true))
    } else if let Some(authority) = uri.strip_prefix(&plain_prefix) {
        Ok((format!("http://{authority}"), false))
    } else {
        Err(format!("unsupported transport URI scheme: {uri}").into())
    }
}

/// Flight SQL session over a tonic channel
#[derive(Debug)]
pub struct FlightSqlTransport {
    client: FlightSqlServiceClient<Channel>,
}

impl FlightSqlTransport {
    async fn connect(target: &ConnectionTarget) -> Result<Self, TransportError> {
        let (uri, tls) = endpoint_uri(target.uri())?;

        let mut endpoint = Endpoint::from_shared(uri)?;
        if tls {
            endpoint = endpoint.tls_config(ClientTlsConfig::new().with_native_roots())?;
        }
        let channel = endpoint.connect().await?;

        let mut client = FlightSqlServiceClient::new(channel);

        if let (Some(username), Some(password)) = (
            target.auth_option(AuthOption::Username),
            target.auth_option(AuthOption::Password),
        ) {
            client.handshake(username, password).await?;
        }

        for (key, value) in target.transport_options() {
            client.set_header(key.clone(), value.clone());
        }

        debug!(uri = target.uri(), "Flight SQL session established");
        Ok(Self { client })
    }
}

impl TransportClient for FlightSqlTransport {
    fn query(&mut self, sql: &str) -> Result<Box<dyn ResultReader>, TransportError> {
        let info = TOKIO_RUNTIME.block_on(self.client.execute(sql.to_string(), None))?;

        Ok(Box::new(FlightResultReader {
            client: self.client.clone(),
            info,
        }))
    }

    fn prepare(&mut self, sql: &str) -> Result<Box<dyn PreparedQuery>, TransportError> {
        let statement = TOKIO_RUNTIME.block_on(self.client.prepare(sql.to_string(), None))?;

        Ok(Box::new(FlightPreparedQuery {
            client: self.client.clone(),
            statement: Some(statement),
        }))
    }

    fn close(&mut self) -> Result<(), TransportError> {
        // The channel is released when the client is dropped
        Ok(())
    }
}

/// Prepared statement handle, closed on the server when dropped
struct FlightPreparedQuery {
    client: FlightSqlServiceClient<Channel>,
    statement: Option<PreparedStatement<Channel>>,
}

impl PreparedQuery for FlightPreparedQuery {
    fn query(&mut self, parameters: &Parameters) -> Result<Box<dyn ResultReader>, TransportError> {
        let statement = self
            .statement
            .as_mut()
            .ok_or("prepared statement is already closed")?;

        statement.set_parameters(bind_parameters(parameters)?)?;
        let info = TOKIO_RUNTIME.block_on(statement.execute())?;

        Ok(Box::new(FlightResultReader {
            client: self.client.clone(),
            info,
        }))
    }
}

impl Drop for FlightPreparedQuery {
    fn drop(&mut self) {
        if let Some(statement) = self.statement.take() {
            if let Err(e) = TOKIO_RUNTIME.block_on(statement.close()) {
                debug!(error = %e, "Failed to close prepared statement");
            }
        }
    }
}

/// Result of one statement, fetched lazily by ticket
struct FlightResultReader {
    client: FlightSqlServiceClient<Channel>,
    info: FlightInfo,
}

impl ResultReader for FlightResultReader {
    fn read_all(self: Box<Self>) -> Result<ResultTable, TransportError> {
        let FlightResultReader { mut client, info } = *self;

        TOKIO_RUNTIME.block_on(async move {
            let declared_schema = if info.schema.is_empty() {
                None
            } else {
                Some(Arc::new(info.clone().try_decode_schema()?))
            };

            let mut batches: Vec<RecordBatch> = Vec::new();
            for endpoint in info.endpoint {
                let Some(ticket) = endpoint.ticket else {
                    continue;
                };
                let stream = client.do_get(ticket).await?;
                let mut chunk: Vec<RecordBatch> = stream.try_collect().await?;
                batches.append(&mut chunk);
            }

            let schema = resolve_schema(declared_schema, &batches);
            Ok::<_, TransportError>(ResultTable::new(schema, batches))
        })
    }
}

/// Schema of a statement result.
///
/// The schema declared in the `FlightInfo` wins; without one the first
/// batch's schema is used, and a result with neither has an empty schema.
pub fn resolve_schema(declared: Option<SchemaRef>, batches: &[RecordBatch]) -> SchemaRef {
    declared
        .or_else(|| batches.first().map(RecordBatch::schema))
        .unwrap_or_else(|| Arc::new(Schema::empty()))
}
