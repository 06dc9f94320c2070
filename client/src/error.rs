use crate::credentials::CredentialsError;
use thiserror::Error;

/// Errors returned by a fetch from the source API.  The taxonomy is the
/// contract with the host scheduler: [`FetchError::RateLimited`] is surfaced
/// distinctly from [`FetchError::Network`] so that the host's backoff policy
/// can apply a longer delay.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request is malformed; detected before any network call is made.
    #[error("invalid fetch request: {0}")]
    InvalidRequest(String),

    /// Credentials are missing, expired, or rejected by the source API.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The identifier does not resolve to an object on the source.
    #[error("no such object: {0}")]
    NotFound(String),

    /// The source API is throttling requests.
    #[error("rate limited by the source API: {0}")]
    RateLimited(String),

    /// Transport-level failure, including server errors.
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<CredentialsError> for FetchError {
    fn from(err: CredentialsError) -> Self {
        FetchError::Auth(err.to_string())
    }
}
