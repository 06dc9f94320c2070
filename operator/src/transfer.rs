use crate::error::{ErrorKind, TransferError};
use crate::request::TransferRequest;
use crate::services::{ObjectFetcher, ObjectStore};
use octostore::{CredentialsResolver, Github};
use octostore_gcs::GcsStore;
use slog::{debug, info, o, warn, Logger};
use std::fmt;
use std::sync::Arc;

/// The states a transfer moves through.  Nothing is persisted between
/// attempts: every scheduled attempt starts a fresh operation at `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    Pending,
    Fetching,
    Writing,
    Done,
    Failed,
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            TransferState::Pending => "pending",
            TransferState::Fetching => "fetching",
            TransferState::Writing => "writing",
            TransferState::Done => "done",
            TransferState::Failed => "failed",
        })
    }
}

/// The completion signal returned to the host scheduler.  No partial success
/// is ever reported: either the full fetch-and-write sequence completed, or
/// the run failed with the kind and message of the first error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Success,
    Failure { kind: ErrorKind, message: String },
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success)
    }
}

impl From<TransferError> for TransferOutcome {
    fn from(err: TransferError) -> Self {
        TransferOutcome::Failure {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// A TransferOperation performs one fetch-and-write transfer to completion.
/// It is constructed fresh for each scheduled run and consumed by
/// [`TransferOperation::execute`]; concurrent runs share nothing, so
/// last-writer-wins at the storage layer is the consistency model.
pub struct TransferOperation {
    request: TransferRequest,
    resolver: Arc<dyn CredentialsResolver>,
    logger: Logger,
    state: TransferState,
}

impl TransferOperation {
    /// Create an operation for the given request.  The resolver supplies
    /// credentials for both connection ids at execution time; the logger is
    /// supplied by the host.
    pub fn new(
        request: TransferRequest,
        resolver: Arc<dyn CredentialsResolver>,
        logger: Logger,
    ) -> Self {
        let logger = logger.new(o!(
            "src" => request.src.clone(),
            "bucket" => request.bucket.clone(),
            "dst" => request.dst.clone()
        ));
        Self {
            request,
            resolver,
            logger,
            state: TransferState::Pending,
        }
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    /// Execute the transfer, constructing this run's own fetcher and writer
    /// bound to the request's connection ids.  All resilience is the host
    /// scheduler's responsibility: no retries happen here, and the first
    /// error is reported unchanged.
    pub async fn execute(mut self) -> TransferOutcome {
        match self.execute_inner().await {
            Ok(()) => TransferOutcome::Success,
            Err(err) => {
                warn!(
                    self.logger, "transfer failed";
                    "kind" => %err.kind(),
                    "error" => %err
                );
                err.into()
            }
        }
    }

    async fn execute_inner(&mut self) -> Result<(), TransferError> {
        let fetcher = Github::builder(
            self.request.source_conn_id.clone(),
            Arc::clone(&self.resolver),
        )
        .build()?;

        let mut builder = GcsStore::builder(
            self.request.google_cloud_storage_conn_id.clone(),
            Arc::clone(&self.resolver),
        );
        if let Some(ref subject) = self.request.delegate_to {
            builder = builder.delegate_to(subject.clone());
        }
        let store = builder.build()?;

        self.execute_with(&fetcher, &store).await
    }

    /// The transfer algorithm, with the collaborators injected.  Exactly one
    /// fetch and at most one write occur; any error moves the operation to
    /// `Failed` and is returned unchanged.
    pub(crate) async fn execute_with<F, S>(
        &mut self,
        fetcher: &F,
        store: &S,
    ) -> Result<(), TransferError>
    where
        F: ObjectFetcher + ?Sized,
        S: ObjectStore + ?Sized,
    {
        let res = self.run(fetcher, store).await;
        if res.is_err() {
            self.transition(TransferState::Failed);
        }
        res
    }

    async fn run<F, S>(&mut self, fetcher: &F, store: &S) -> Result<(), TransferError>
    where
        F: ObjectFetcher + ?Sized,
        S: ObjectStore + ?Sized,
    {
        // pre-flight: reject malformed requests before any network call
        self.request.validate()?;
        let path = self.request.source_path()?;

        self.transition(TransferState::Fetching);
        let fetched = fetcher.fetch(&path).await?;
        debug!(self.logger, "fetched source object"; "bytes" => fetched.payload.len());

        self.transition(TransferState::Writing);
        let content_type = self
            .request
            .mime_type
            .as_deref()
            .or(fetched.content_type.as_deref());
        store
            .write(
                &self.request.bucket,
                &self.request.dst,
                &fetched.payload,
                content_type,
                self.request.gzip,
            )
            .await?;

        self.transition(TransferState::Done);
        info!(self.logger, "transfer complete");
        Ok(())
    }

    fn transition(&mut self, next: TransferState) {
        debug!(self.logger, "state transition"; "from" => %self.state, "to" => %next);
        self.state = next;
    }
}
