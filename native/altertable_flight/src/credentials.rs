/// Connection credentials and target resolution
///
/// This module holds the validated connection parameters for an Altertable
/// endpoint and derives the transport-level `ConnectionTarget` from them.
///
/// Credentials come either from the builder methods on [`Credentials`] or from
/// the host's configuration mapping via [`Credentials::from_config`]:
/// - `username`, `password` - required
/// - `host` - defaults to `flight.altertable.ai`
/// - `port` - defaults to `443`, must lie in `0..=65535`
/// - `tls` - defaults to `true`
/// - `database`, `schema` - optional, forwarded as connection options
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::*;
use crate::error::{AdapterError, Result};

/// Options sent with the authentication handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOption {
    Username,
    Password,
}

impl AuthOption {
    pub fn key(self) -> &'static str {
        match self {
            AuthOption::Username => USERNAME_OPTION,
            AuthOption::Password => PASSWORD_OPTION,
        }
    }
}

/// Options scoped to the opened connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionOption {
    CurrentCatalog,
    CurrentDbSchema,
}

impl ConnectionOption {
    pub fn key(self) -> &'static str {
        match self {
            ConnectionOption::CurrentCatalog => CURRENT_CATALOG_OPTION,
            ConnectionOption::CurrentDbSchema => CURRENT_DB_SCHEMA_OPTION,
        }
    }
}

/// Where and how the transport client connects
///
/// Derived from [`Credentials::build_target`]; read-only once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    uri: String,
    auth_options: BTreeMap<String, String>,
    transport_options: BTreeMap<String, String>,
}

impl ConnectionTarget {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn auth_options(&self) -> &BTreeMap<String, String> {
        &self.auth_options
    }

    pub fn transport_options(&self) -> &BTreeMap<String, String> {
        &self.transport_options
    }

    pub fn auth_option(&self, option: AuthOption) -> Option<&str> {
        self.auth_options.get(option.key()).map(String::as_str)
    }
}

impl fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let auth_keys: Vec<&String> = self.auth_options.keys().collect();
        f.debug_struct("ConnectionTarget")
            .field("uri", &self.uri)
            .field("auth_options", &auth_keys)
            .field("transport_options", &self.transport_options)
            .finish()
    }
}

/// Raw configuration mapping as handed over by the host
///
/// `port` is kept signed so an out-of-range value is reported as an invalid
/// configuration rather than a parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<i64>,
    pub tls: Option<bool>,
    pub database: Option<String>,
    pub schema: Option<String>,
}

/// Validated Altertable connection parameters
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
    host: String,
    port: u16,
    tls: bool,
    database: Option<String>,
    schema: Option<String>,
}

impl Credentials {
    /// Credentials with the default endpoint, port and TLS setting.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            tls: DEFAULT_TLS,
            database: None,
            schema: None,
        }
    }

    /// Parse credentials from the host's configuration mapping.
    ///
    /// Keys the adapter does not recognise are ignored. Wrong value types, a
    /// missing `username`/`password` and an out-of-range `port` are all
    /// reported as `InvalidConfiguration`.
    pub fn from_config(config: &serde_json::Value) -> Result<Self> {
        let raw = CredentialsConfig::deserialize(config)
            .map_err(|e| AdapterError::InvalidConfiguration(e.to_string()))?;
        Self::try_from(raw)
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port, rejecting values outside `0..=65535`.
    pub fn with_port(mut self, port: i64) -> Result<Self> {
        self.port = validate_port(port)?;
        Ok(self)
    }

    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn tls(&self) -> bool {
        self.tls
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Adapter type these credentials belong to.
    pub fn type_name(&self) -> &'static str {
        ADAPTER_TYPE
    }

    /// Field that identifies the warehouse these credentials point at.
    pub fn unique_field(&self) -> &'static str {
        "host"
    }

    /// Keys shown when the host prints connection details.
    pub fn connection_keys(&self) -> &'static [&'static str] {
        &[
            "username", "password", "database", "schema", "host", "port", "tls",
        ]
    }

    /// Transport endpoint URI: `grpc+tls://host:port` or `grpc://host:port`.
    pub fn uri(&self) -> String {
        let scheme = if self.tls { SECURE_SCHEME } else { PLAIN_SCHEME };
        format!("{scheme}://{}:{}", self.host, self.port)
    }

    /// Derive the connection target. Pure: no network access.
    pub fn build_target(&self) -> ConnectionTarget {
        let auth_options = BTreeMap::from([
            (AuthOption::Username.key().to_string(), self.username.clone()),
            (AuthOption::Password.key().to_string(), self.password.clone()),
        ]);

        let transport_options = [
            (ConnectionOption::CurrentCatalog, self.database.as_ref()),
            (ConnectionOption::CurrentDbSchema, self.schema.as_ref()),
        ]
        .into_iter()
        .filter_map(|(option, value)| value.map(|v| (option.key().to_string(), v.clone())))
        .collect();

        ConnectionTarget {
            uri: self.uri(),
            auth_options,
            transport_options,
        }
    }
}

impl TryFrom<CredentialsConfig> for Credentials {
    type Error = AdapterError;

    fn try_from(raw: CredentialsConfig) -> Result<Self> {
        let username = raw
            .username
            .ok_or_else(|| AdapterError::InvalidConfiguration("missing 'username'".to_string()))?;
        let password = raw
            .password
            .ok_or_else(|| AdapterError::InvalidConfiguration("missing 'password'".to_string()))?;

        let mut credentials = Credentials::new(username, password);
        if let Some(host) = raw.host {
            credentials.host = host;
        }
        if let Some(port) = raw.port {
            credentials.port = validate_port(port)?;
        }
        if let Some(tls) = raw.tls {
            credentials.tls = tls;
        }
        credentials.database = raw.database;
        credentials.schema = raw.schema;

        Ok(credentials)
    }
}

// Manual Debug so the password never reaches logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls", &self.tls)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .finish()
    }
}

fn validate_port(port: i64) -> Result<u16> {
    u16::try_from(port).map_err(|_| {
        AdapterError::InvalidConfiguration(format!("port {port} is outside 0..=65535"))
    })
}
