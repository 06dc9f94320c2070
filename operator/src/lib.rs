/*! The octostore transfer operation.

This crate composes the two leaf clients -- the GitHub fetcher from
[`octostore`] and the GCS writer from [`octostore_gcs`] -- into a single
[`TransferOperation`] suitable for invocation by a scheduled-workflow host.

One execution performs exactly one fetch and at most one write:

1. validate the [`TransferRequest`], failing fast with `InvalidRequest`
   before any network call;
2. fetch the source object;
3. write it to the destination bucket key, optionally gzip-compressed;
4. report a [`TransferOutcome`] to the caller.

The operation performs no retries and no partial-write recovery; all
resilience belongs to the host scheduler's attempt-retry mechanism.  Errors
are propagated unchanged, and rate limiting is reported distinctly from
generic network failure so the host's backoff policy can react.  The storage
write overwrites unconditionally, so re-running the same request after a
failure produces the same end state.

Each scheduled run should construct its own operation, with its own injected
[`CredentialsResolver`](octostore::CredentialsResolver) and `slog::Logger`;
nothing is shared between runs.
 */
mod error;
mod request;
mod services;
mod transfer;

#[cfg(test)]
mod test_helpers;

pub use error::{ErrorKind, TransferError};
pub use request::TransferRequest;
pub use services::{ObjectFetcher, ObjectStore};
pub use transfer::{TransferOperation, TransferOutcome, TransferState};
