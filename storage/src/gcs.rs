use crate::error::WriteError;
use flate2::write::GzEncoder;
use flate2::Compression;
use octostore::CredentialsResolver;
use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// GcsStoreBuilder implements the builder pattern for building a
/// [`GcsStore`], allowing optional configuration of the request timeout and
/// a delegation subject.
pub struct GcsStoreBuilder {
    conn_id: String,
    resolver: Arc<dyn CredentialsResolver>,
    delegate_to: Option<String>,
    timeout: Duration,
}

impl GcsStoreBuilder {
    /// Create a new GcsStoreBuilder for the given connection id.  The
    /// resolver is consulted on every write, not at construction.
    pub fn new<S: Into<String>>(conn_id: S, resolver: Arc<dyn CredentialsResolver>) -> Self {
        Self {
            conn_id: conn_id.into(),
            resolver,
            delegate_to: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Perform writes on behalf of the given identity instead of the
    /// connection's default identity.
    pub fn delegate_to<S: Into<String>>(mut self, subject: S) -> Self {
        self.delegate_to = Some(subject.into());
        self
    }

    /// Set the timeout for each HTTP request made by the store.  The default
    /// is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the resulting store, consuming the builder.
    pub fn build(self) -> Result<GcsStore, WriteError> {
        GcsStore::new(self)
    }
}

/// GcsStore wraps credential resolution and a single bucket-object write
/// against the Google Cloud Storage JSON API.  It exposes one capability:
/// [`GcsStore::write`].
pub struct GcsStore {
    conn_id: String,
    resolver: Arc<dyn CredentialsResolver>,
    delegate_to: Option<String>,
    client: reqwest::Client,
}

impl GcsStore {
    pub fn builder<S: Into<String>>(
        conn_id: S,
        resolver: Arc<dyn CredentialsResolver>,
    ) -> GcsStoreBuilder {
        GcsStoreBuilder::new(conn_id, resolver)
    }

    fn new(b: GcsStoreBuilder) -> Result<GcsStore, WriteError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(b.timeout)
            .build()?;
        Ok(GcsStore {
            conn_id: b.conn_id,
            resolver: b.resolver,
            delegate_to: b.delegate_to,
            client,
        })
    }

    /// Write `payload` to `bucket` at `key`, overwriting any existing object.
    /// When `compress` is true the payload is gzip-compressed in memory and
    /// the stored object carries `Content-Encoding: gzip` so that downstream
    /// readers can decompress it.  The recorded content type falls back to
    /// `application/octet-stream` when `content_type` is not given.
    pub async fn write(
        &self,
        bucket: &str,
        key: &str,
        payload: &[u8],
        content_type: Option<&str>,
        compress: bool,
    ) -> Result<(), WriteError> {
        if bucket.is_empty() {
            return Err(WriteError::InvalidRequest(
                "bucket must be non-empty".to_string(),
            ));
        }
        if key.is_empty() {
            return Err(WriteError::InvalidRequest(
                "key must be non-empty".to_string(),
            ));
        }

        let connection = self
            .resolver
            .resolve(&self.conn_id, self.delegate_to.as_deref())?;

        let url = format!(
            "{}/upload/storage/v1/b/{}/o",
            connection.base_url.trim_end_matches('/'),
            bucket
        );
        let url = reqwest::Url::parse(&url)
            .map_err(|e| WriteError::InvalidRequest(format!("invalid request URL {}: {}", url, e)))?;

        let body = if compress {
            gzip(payload)
        } else {
            payload.to_vec()
        };

        let mut req = self
            .client
            .post(url)
            .query(&[("uploadType", "media"), ("name", key)])
            .header(CONTENT_TYPE, content_type.unwrap_or(DEFAULT_CONTENT_TYPE));
        if compress {
            req = req.header(CONTENT_ENCODING, "gzip");
        }
        if let Some(ref token) = connection.token {
            req = req.bearer_auth(token);
        }

        let resp = req.body(body).send().await?;
        let status = resp.status();

        if status.is_success() {
            return Ok(());
        }

        if status.is_server_error() {
            return Err(WriteError::Network(resp.error_for_status().err().unwrap()));
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(WriteError::Auth(api_message(resp).await)),
            StatusCode::FORBIDDEN => Err(WriteError::PermissionDenied(api_message(resp).await)),
            StatusCode::NOT_FOUND => Err(WriteError::BucketNotFound(bucket.to_string())),
            _ => Err(WriteError::InvalidRequest(api_message(resp).await)),
        }
    }
}

/// Gzip-compress a payload in memory.
fn gzip(payload: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    // writes into a Vec cannot fail
    encoder.write_all(payload).unwrap();
    encoder.finish().unwrap()
}

/// Extract the error message from a GCS error body, falling back to the
/// status line when the body is not the expected JSON document.
async fn api_message(resp: reqwest::Response) -> String {
    let fallback = resp
        .status()
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();
    match resp.json::<Value>().await {
        Ok(json) => json
            .pointer("/error/message")
            .and_then(|m| m.as_str())
            .map(str::to_owned)
            .unwrap_or(fallback),
        Err(_) => fallback,
    }
}
