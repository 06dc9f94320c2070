use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// A Connection is the credential bundle that a connection id resolves to: the
/// base URL of the remote service and, optionally, a bearer token.  A missing
/// token makes unauthenticated requests.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Base URL of the remote API, e.g. `https://api.github.com`
    #[serde(rename = "baseUrl")]
    pub base_url: String,

    /// Bearer token, if the connection is authenticated
    pub token: Option<String>,
}

impl Connection {
    /// Create a new unauthenticated Connection for the given base URL.
    pub fn new<S: Into<String>>(base_url: S) -> Connection {
        Connection {
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Create a new Connection with a bearer token.
    pub fn with_token<S1: Into<String>, S2: Into<String>>(base_url: S1, token: S2) -> Connection {
        Connection {
            base_url: base_url.into(),
            token: Some(token.into()),
        }
    }
}

/// Errors arising from credential resolution.  These are distinct from
/// [`FetchError`](crate::FetchError) so that resolvers can be shared between
/// the fetch and storage sides of a transfer; both sides treat a resolution
/// failure as an authentication failure.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// The connection id does not resolve to any credentials.
    #[error("unknown connection id {0:?}")]
    UnknownConnection(String),

    /// The resolver cannot mint credentials on behalf of the requested
    /// identity.
    #[error("connection {conn_id:?} cannot delegate to {subject:?}")]
    DelegationUnsupported { conn_id: String, subject: String },

    /// The connection exists but its stored form is unusable.
    #[error("malformed connection {0:?}: {1}")]
    Malformed(String, String),

    /// Any other resolver-specific failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A CredentialsResolver supplies Connections on demand.  Call this each time
/// credentials are needed, rather than caching the result, so that rotated
/// credentials are picked up between scheduled runs.  This trait is also the
/// point of dependency injection for tests.
pub trait CredentialsResolver: 'static + Sync + Send {
    /// Resolve a connection id to a [`Connection`].  When `delegate_to` is
    /// given, the returned credentials must act on behalf of that identity
    /// rather than the connection's default identity; resolvers that cannot
    /// delegate must fail with [`CredentialsError::DelegationUnsupported`].
    fn resolve(
        &self,
        conn_id: &str,
        delegate_to: Option<&str>,
    ) -> Result<Connection, CredentialsError>;
}

/// A StaticResolver holds a fixed set of already-resolved Connections.  This
/// is the resolver of choice for hosts that manage credentials themselves and
/// hand the operation fully-resolved credential objects.
#[derive(Default)]
pub struct StaticResolver {
    connections: HashMap<String, Connection>,
    delegated: HashMap<(String, String), Connection>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection under the given id, replacing any existing one.
    pub fn insert<S: Into<String>>(mut self, conn_id: S, connection: Connection) -> Self {
        self.connections.insert(conn_id.into(), connection);
        self
    }

    /// Register credentials to use when the given connection id is resolved
    /// on behalf of `subject`.
    pub fn insert_delegated<S1, S2>(
        mut self,
        conn_id: S1,
        subject: S2,
        connection: Connection,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        self.delegated
            .insert((conn_id.into(), subject.into()), connection);
        self
    }
}

impl CredentialsResolver for StaticResolver {
    fn resolve(
        &self,
        conn_id: &str,
        delegate_to: Option<&str>,
    ) -> Result<Connection, CredentialsError> {
        if let Some(subject) = delegate_to {
            return self
                .delegated
                .get(&(conn_id.to_string(), subject.to_string()))
                .cloned()
                .ok_or_else(|| CredentialsError::DelegationUnsupported {
                    conn_id: conn_id.to_string(),
                    subject: subject.to_string(),
                });
        }
        self.connections
            .get(conn_id)
            .cloned()
            .ok_or_else(|| CredentialsError::UnknownConnection(conn_id.to_string()))
    }
}

/// An EnvResolver reads connections from environment variables:
///
/// * `OCTOSTORE_CONN_<ID>_URL` -- the base URL (required)
/// * `OCTOSTORE_CONN_<ID>_TOKEN` -- the bearer token (optional)
///
/// where `<ID>` is the connection id, uppercased, with `-` replaced by `_`.
/// Environment-provided tokens are minted for a single identity, so this
/// resolver does not support delegation.
pub struct EnvResolver {
    prefix: String,
}

impl Default for EnvResolver {
    fn default() -> Self {
        Self {
            prefix: "OCTOSTORE_CONN".to_string(),
        }
    }
}

impl EnvResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a prefix other than `OCTOSTORE_CONN`.
    pub fn with_prefix<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn var_name(&self, conn_id: &str, suffix: &str) -> String {
        let id = conn_id.to_uppercase().replace('-', "_");
        format!("{}_{}_{}", self.prefix, id, suffix)
    }
}

impl CredentialsResolver for EnvResolver {
    fn resolve(
        &self,
        conn_id: &str,
        delegate_to: Option<&str>,
    ) -> Result<Connection, CredentialsError> {
        if let Some(subject) = delegate_to {
            return Err(CredentialsError::DelegationUnsupported {
                conn_id: conn_id.to_string(),
                subject: subject.to_string(),
            });
        }

        let base_url = match env::var(self.var_name(conn_id, "URL")) {
            Ok(url) if url.is_empty() => {
                return Err(CredentialsError::Malformed(
                    conn_id.to_string(),
                    "base URL is empty".to_string(),
                ))
            }
            Ok(url) => url,
            Err(env::VarError::NotPresent) => {
                return Err(CredentialsError::UnknownConnection(conn_id.to_string()))
            }
            Err(err) => {
                return Err(CredentialsError::Malformed(
                    conn_id.to_string(),
                    err.to_string(),
                ))
            }
        };

        let token = match env::var(self.var_name(conn_id, "TOKEN")) {
            Ok(token) if token.is_empty() => None,
            Ok(token) => Some(token),
            Err(env::VarError::NotPresent) => None,
            Err(err) => {
                return Err(CredentialsError::Malformed(
                    conn_id.to_string(),
                    err.to_string(),
                ))
            }
        };

        Ok(Connection { base_url, token })
    }
}
