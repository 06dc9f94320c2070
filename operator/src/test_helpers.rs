//! Utilities for testing transfers without network collaborators.
use crate::services::{ObjectFetcher, ObjectStore};
use async_trait::async_trait;
use octostore::{FetchError, FetchResult};
use octostore_gcs::WriteError;
use slog::{o, Drain, Logger};
use std::sync::{Arc, Mutex};

/// Create a Logger for use in tests
pub(crate) fn test_logger() -> Logger {
    let decorator = slog_term::PlainSyncDecorator::new(slog_term::TestStdoutWriter);
    let drain = slog_term::FullFormat::new(decorator).build().fuse();

    Logger::root(drain, o!())
}

/// Event logger, used to record fetch and write invocations from the fakes
/// and then assert on them.  Sharing one log between both fakes captures the
/// relative ordering of calls.
#[derive(Default, Clone)]
pub(crate) struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub(crate) fn log<S: Into<String>>(&self, event: S) {
        self.events.lock().unwrap().push(event.into())
    }

    pub(crate) fn assert(&self, expected: Vec<String>) {
        assert_eq!(*self.events.lock().unwrap(), expected);
    }
}

/// Fake implementation of the fetch side.  The prepared result can be
/// consumed only once, so a transfer that fetches twice fails the test.
pub(crate) struct FakeFetcher {
    log: EventLog,
    result: Mutex<Option<Result<FetchResult, FetchError>>>,
}

impl FakeFetcher {
    pub(crate) fn ok(log: EventLog, payload: &[u8], content_type: Option<&str>) -> Self {
        Self {
            log,
            result: Mutex::new(Some(Ok(FetchResult {
                payload: payload.to_vec(),
                content_type: content_type.map(str::to_owned),
            }))),
        }
    }

    pub(crate) fn err(log: EventLog, err: FetchError) -> Self {
        Self {
            log,
            result: Mutex::new(Some(Err(err))),
        }
    }
}

#[async_trait]
impl ObjectFetcher for FakeFetcher {
    async fn fetch(&self, identifier: &str) -> Result<FetchResult, FetchError> {
        self.log.log(format!("fetch {}", identifier));
        self.result
            .lock()
            .unwrap()
            .take()
            .expect("fetch called more than once")
    }
}

/// Fake implementation of the storage side, recording each write's arguments.
pub(crate) struct FakeStore {
    log: EventLog,
    result: Mutex<Option<Result<(), WriteError>>>,
}

impl FakeStore {
    pub(crate) fn ok(log: EventLog) -> Self {
        Self {
            log,
            result: Mutex::new(Some(Ok(()))),
        }
    }

    pub(crate) fn err(log: EventLog, err: WriteError) -> Self {
        Self {
            log,
            result: Mutex::new(Some(Err(err))),
        }
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn write(
        &self,
        bucket: &str,
        key: &str,
        payload: &[u8],
        content_type: Option<&str>,
        compress: bool,
    ) -> Result<(), WriteError> {
        self.log.log(format!(
            "write {} {} {} {:?} gzip={}",
            bucket,
            key,
            String::from_utf8_lossy(payload),
            content_type,
            compress,
        ));
        self.result
            .lock()
            .unwrap()
            .take()
            .expect("write called more than once")
    }
}
