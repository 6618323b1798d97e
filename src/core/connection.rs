//! core::connection
//!
//! ADO.NET-style connection-descriptor parsing and validation.
//!
//! # Design
//!
//! The operator hands us the same `Key=Value;` connection string the rest of
//! their EF tooling uses. We parse and validate it up front, before any file
//! or network activity, so a bad descriptor fails at the argument boundary.
//!
//! Validation requirements:
//! - a server must be specified (`Server` / `Data Source` / `Address`)
//! - an `Initial Catalog` / `Database` must be specified
//! - SQL credentials must be specified (`User ID` + `Password`)
//!
//! Unknown keys (e.g. `MultipleActiveResultSets`) are ignored, matching the
//! permissive behavior of ADO.NET connection-string builders.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tiberius::{AuthMethod, Config, EncryptionLevel};

/// Default SQL Server TCP port.
const DEFAULT_PORT: u16 = 1433;

/// Errors from connection-descriptor parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectionError {
    /// A segment was not of the form `Key=Value`.
    #[error("connection string segment '{0}' is not Key=Value")]
    MalformedSegment(String),

    /// No server host was specified.
    #[error("no Server was specified")]
    MissingServer,

    /// No database was specified.
    #[error("no InitialCatalog was specified")]
    MissingInitialCatalog,

    /// SQL authentication credentials are incomplete.
    #[error("no SQL credentials were specified (User ID and Password are required)")]
    MissingCredentials,

    /// Windows integrated authentication was requested.
    #[error("Integrated Security is not supported; use SQL authentication")]
    IntegratedSecurityUnsupported,

    /// The server value named an instance instead of a host/port.
    #[error("named instance '{0}' is not supported; specify a host and port")]
    NamedInstanceUnsupported(String),

    /// The server port was not a number.
    #[error("invalid port '{0}'")]
    InvalidPort(String),

    /// A boolean-valued key held an unrecognized value.
    #[error("invalid boolean value '{value}' for '{key}'")]
    InvalidBool { key: String, value: String },
}

/// A parsed and validated catalog connection descriptor.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    /// Server host name or address.
    pub host: String,
    /// Server TCP port (defaults to 1433).
    pub port: u16,
    /// Database (Initial Catalog) to document.
    pub database: String,
    /// SQL login.
    pub user: String,
    /// SQL password.
    pub password: String,
    /// Skip server certificate validation.
    pub trust_server_certificate: bool,
    /// Require TLS for the connection.
    pub encrypt: bool,
}

impl ConnectionDescriptor {
    /// Build a tiberius client configuration from this descriptor.
    pub fn to_client_config(&self) -> Config {
        let mut config = Config::new();
        config.host(&self.host);
        config.port(self.port);
        config.database(&self.database);
        config.authentication(AuthMethod::sql_server(&self.user, &self.password));
        if self.trust_server_certificate {
            config.trust_cert();
        }
        if !self.encrypt {
            config.encryption(EncryptionLevel::NotSupported);
        }
        config
    }

    /// The address to dial, as `host:port`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Manual Debug so the password never ends up in logs or error output.
impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("trust_server_certificate", &self.trust_server_certificate)
            .field("encrypt", &self.encrypt)
            .finish()
    }
}

impl FromStr for ConnectionDescriptor {
    type Err = ConnectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut server: Option<(String, u16)> = None;
        let mut database: Option<String> = None;
        let mut user: Option<String> = None;
        let mut password: Option<String> = None;
        let mut trust_server_certificate = false;
        let mut encrypt = false;

        for segment in s.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| ConnectionError::MalformedSegment(segment.to_string()))?;
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim().trim_matches('"').trim_matches('\'');

            match key.as_str() {
                "server" | "data source" | "address" | "addr" | "network address" => {
                    server = Some(parse_server(value)?);
                }
                "database" | "initial catalog" => {
                    database = Some(value.to_string());
                }
                "user id" | "uid" | "user" => {
                    user = Some(value.to_string());
                }
                "password" | "pwd" => {
                    password = Some(value.to_string());
                }
                "trustservercertificate" | "trust server certificate" => {
                    trust_server_certificate = parse_bool(&key, value)?;
                }
                "encrypt" => {
                    encrypt = parse_bool(&key, value)?;
                }
                "integrated security" | "trusted_connection" => {
                    let requested =
                        value.eq_ignore_ascii_case("sspi") || parse_bool(&key, value)?;
                    if requested {
                        return Err(ConnectionError::IntegratedSecurityUnsupported);
                    }
                }
                // Other ADO.NET keys carry no meaning here.
                _ => {}
            }
        }

        let (host, port) = server.ok_or(ConnectionError::MissingServer)?;
        let database = database
            .filter(|d| !d.is_empty())
            .ok_or(ConnectionError::MissingInitialCatalog)?;
        let (user, password) = match (user, password) {
            (Some(u), Some(p)) if !u.is_empty() => (u, p),
            _ => return Err(ConnectionError::MissingCredentials),
        };

        Ok(Self {
            host,
            port,
            database,
            user,
            password,
            trust_server_certificate,
            encrypt,
        })
    }
}

/// Parse a `Server=` value into host and port.
///
/// Accepts `host`, `host,port`, and a leading `tcp:` prefix. Named instances
/// (`host\instance`) require the SQL browser protocol and are rejected.
fn parse_server(value: &str) -> Result<(String, u16), ConnectionError> {
    let value = value
        .strip_prefix("tcp:")
        .or_else(|| value.strip_prefix("TCP:"))
        .unwrap_or(value);

    if value.contains('\\') {
        return Err(ConnectionError::NamedInstanceUnsupported(value.to_string()));
    }

    match value.split_once(',') {
        Some((host, port)) => {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConnectionError::InvalidPort(port.trim().to_string()))?;
            Ok((host.trim().to_string(), port))
        }
        None => Ok((value.trim().to_string(), DEFAULT_PORT)),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConnectionError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConnectionError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
