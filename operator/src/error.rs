use octostore::FetchError;
use octostore_gcs::WriteError;
use std::fmt;
use thiserror::Error;

/// Error raised by a transfer execution.  Fetch and write errors are carried
/// unchanged; the operation adds only its own pre-flight validation variant.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The request is missing or has empty required parameters; no network
    /// call was made.
    #[error("invalid transfer request: {0}")]
    InvalidRequest(String),

    /// The fetch step failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The write step failed.
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// The failure taxonomy surfaced to the host scheduler.  `RateLimited` is
/// distinct from `NetworkFailure` so the host can apply a longer backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    AuthFailure,
    NotFound,
    RateLimited,
    PermissionDenied,
    BucketNotFound,
    NetworkFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::InvalidRequest => "invalid-request",
            ErrorKind::AuthFailure => "auth-failure",
            ErrorKind::NotFound => "not-found",
            ErrorKind::RateLimited => "rate-limited",
            ErrorKind::PermissionDenied => "permission-denied",
            ErrorKind::BucketNotFound => "bucket-not-found",
            ErrorKind::NetworkFailure => "network-failure",
        })
    }
}

impl TransferError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            TransferError::Fetch(err) => match err {
                FetchError::InvalidRequest(_) => ErrorKind::InvalidRequest,
                FetchError::Auth(_) => ErrorKind::AuthFailure,
                FetchError::NotFound(_) => ErrorKind::NotFound,
                FetchError::RateLimited(_) => ErrorKind::RateLimited,
                FetchError::Network(_) => ErrorKind::NetworkFailure,
            },
            TransferError::Write(err) => match err {
                WriteError::InvalidRequest(_) => ErrorKind::InvalidRequest,
                WriteError::Auth(_) => ErrorKind::AuthFailure,
                WriteError::PermissionDenied(_) => ErrorKind::PermissionDenied,
                WriteError::BucketNotFound(_) => ErrorKind::BucketNotFound,
                WriteError::Network(_) => ErrorKind::NetworkFailure,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_rate_limited_keeps_its_kind() {
        let err = TransferError::from(FetchError::RateLimited("slow down".to_string()));
        assert_eq!(err.kind(), ErrorKind::RateLimited);
    }

    #[test]
    fn write_bucket_not_found_kind() {
        let err = TransferError::from(WriteError::BucketNotFound("b".to_string()));
        assert_eq!(err.kind(), ErrorKind::BucketNotFound);
    }

    #[test]
    fn invalid_request_kind() {
        let err = TransferError::InvalidRequest("src must be non-empty".to_string());
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn kind_display_is_kebab_case() {
        assert_eq!(ErrorKind::RateLimited.to_string(), "rate-limited");
        assert_eq!(ErrorKind::NetworkFailure.to_string(), "network-failure");
    }
}
