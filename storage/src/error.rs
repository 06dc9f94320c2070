use octostore::CredentialsError;
use thiserror::Error;

/// Errors returned by a write to the storage backend.  As with fetches, the
/// taxonomy is the contract with the host scheduler; no local recovery is
/// attempted here.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The request is malformed; detected before any network call is made.
    #[error("invalid write request: {0}")]
    InvalidRequest(String),

    /// Credentials are missing, expired, or rejected by the storage backend.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The credentials are valid but not permitted to write this object.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The destination bucket does not exist.
    #[error("no such bucket: {0}")]
    BucketNotFound(String),

    /// Transport-level failure, including server errors.
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<CredentialsError> for WriteError {
    fn from(err: CredentialsError) -> Self {
        WriteError::Auth(err.to_string())
    }
}
