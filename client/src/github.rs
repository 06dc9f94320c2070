use crate::credentials::CredentialsResolver;
use crate::error::FetchError;
use reqwest::header::{ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// The payload of a successful fetch, owned by the caller for the duration of
/// one transfer execution and never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    /// Raw response body
    pub payload: Vec<u8>,

    /// The `Content-Type` the source reported, if any
    pub content_type: Option<String>,
}

/// GithubBuilder implements the builder pattern for building a [`Github`]
/// client, allowing optional configuration of the request timeout.
pub struct GithubBuilder {
    conn_id: String,
    resolver: Arc<dyn CredentialsResolver>,
    timeout: Duration,
}

impl GithubBuilder {
    /// Create a new GithubBuilder for the given connection id.  The resolver
    /// is consulted on every fetch, not at construction, so that rotated
    /// credentials are honored between scheduled runs.
    pub fn new<S: Into<String>>(conn_id: S, resolver: Arc<dyn CredentialsResolver>) -> Self {
        Self {
            conn_id: conn_id.into(),
            resolver,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the timeout for each HTTP request made by the client.  The default
    /// is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the resulting client, consuming the builder.
    pub fn build(self) -> Result<Github, FetchError> {
        Github::new(self)
    }
}

/// Github wraps credential resolution and a single authenticated GET against
/// the GitHub API.  It exposes one capability: [`Github::fetch`].
pub struct Github {
    conn_id: String,
    resolver: Arc<dyn CredentialsResolver>,
    client: reqwest::Client,
}

impl Github {
    pub fn builder<S: Into<String>>(
        conn_id: S,
        resolver: Arc<dyn CredentialsResolver>,
    ) -> GithubBuilder {
        GithubBuilder::new(conn_id, resolver)
    }

    fn new(b: GithubBuilder) -> Result<Github, FetchError> {
        // redirects are not followed, so the Authorization header cannot leak
        // to a third-party location.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(b.timeout)
            .user_agent(concat!("octostore/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Github {
            conn_id: b.conn_id,
            resolver: b.resolver,
            client,
        })
    }

    /// Perform a GET for the given API path, returning the raw payload.  The
    /// path must be non-empty and must not begin with `/`.
    pub async fn fetch(&self, identifier: &str) -> Result<FetchResult, FetchError> {
        if identifier.is_empty() {
            return Err(FetchError::InvalidRequest(
                "identifier must be non-empty".to_string(),
            ));
        }
        if identifier.starts_with('/') {
            return Err(FetchError::InvalidRequest(
                "identifier must not begin with `/`".to_string(),
            ));
        }

        let connection = self.resolver.resolve(&self.conn_id, None)?;

        let url = format!(
            "{}/{}",
            connection.base_url.trim_end_matches('/'),
            identifier
        );
        let url = reqwest::Url::parse(&url)
            .map_err(|e| FetchError::InvalidRequest(format!("invalid request URL {}: {}", url, e)))?;

        let mut req = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(ref token) = connection.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();

        if status.is_success() {
            let content_type = resp
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let payload = resp.bytes().await?.to_vec();
            return Ok(FetchResult {
                payload,
                content_type,
            });
        }

        // server errors are transport-level from the caller's perspective
        if status.is_server_error() {
            return Err(FetchError::Network(resp.error_for_status().err().unwrap()));
        }

        // 429 always means throttling; GitHub also reports an exhausted quota
        // as 403 with `x-ratelimit-remaining: 0`.
        let quota_exhausted = resp
            .headers()
            .get("x-ratelimit-remaining")
            .map(|v| v == "0")
            .unwrap_or(false);
        if status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::FORBIDDEN && quota_exhausted)
        {
            let retry_after = resp
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let mut message = api_message(resp).await;
            if let Some(seconds) = retry_after {
                message = format!("{} (retry after {}s)", message, seconds);
            }
            return Err(FetchError::RateLimited(message));
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(FetchError::Auth(api_message(resp).await))
            }
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(identifier.to_string())),
            _ => Err(FetchError::InvalidRequest(api_message(resp).await)),
        }
    }
}

/// Extract the `message` property from a GitHub error body, falling back to
/// the status line when the body is not the expected JSON document.
async fn api_message(resp: reqwest::Response) -> String {
    let fallback = resp
        .status()
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();
    match resp.json::<Value>().await {
        Ok(json) => json
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_owned)
            .unwrap_or(fallback),
        Err(_) => fallback,
    }
}
