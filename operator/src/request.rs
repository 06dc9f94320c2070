use crate::error::TransferError;
use serde::{Deserialize, Serialize};

/// The parameters of one transfer, constructed fresh per scheduled run.  The
/// host resolves any templated parameters before the operation executes, so
/// every field here is a plain, already-resolved string.
///
/// Field names match the parameter table the host uses to invoke the
/// operation, so a parameter document can be deserialized directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Source object identifier: a raw API path or `kind:org[/repo]`
    /// shorthand (see [`octostore::source_path`]).
    pub src: String,

    /// Destination key within the bucket
    pub dst: String,

    /// Destination bucket name
    pub bucket: String,

    /// Connection id used to resolve storage credentials
    pub google_cloud_storage_conn_id: String,

    /// Connection id used to resolve source-API credentials
    pub source_conn_id: String,

    /// Content type recorded on the stored object; defaults to the type the
    /// source reported, then `application/octet-stream`
    #[serde(default)]
    pub mime_type: Option<String>,

    /// Identity to impersonate for the storage write
    #[serde(default)]
    pub delegate_to: Option<String>,

    /// Compress the payload before storing
    #[serde(default)]
    pub gzip: bool,
}

impl TransferRequest {
    /// Construct a request from a host-supplied parameter document.
    pub fn from_value(value: serde_json::Value) -> Result<TransferRequest, TransferError> {
        serde_json::from_value(value)
            .map_err(|e| TransferError::InvalidRequest(e.to_string()))
    }

    /// Check that every required parameter is present and non-empty,
    /// identifying the offending field.  No network calls are made.
    pub fn validate(&self) -> Result<(), TransferError> {
        let required = [
            ("src", &self.src),
            ("dst", &self.dst),
            ("bucket", &self.bucket),
            (
                "google_cloud_storage_conn_id",
                &self.google_cloud_storage_conn_id,
            ),
            ("source_conn_id", &self.source_conn_id),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(TransferError::InvalidRequest(format!(
                    "{} must be non-empty",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Resolve `src` to the API path to fetch.  Like [`validate`], this is a
    /// pre-flight check: a malformed source fails before any network call.
    ///
    /// [`validate`]: TransferRequest::validate
    pub fn source_path(&self) -> Result<String, TransferError> {
        Ok(octostore::source_path(&self.src)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn valid_request() -> TransferRequest {
        TransferRequest {
            src: "repos/octocat/hello-world/contents/README.md".to_string(),
            dst: "backups/readme.md".to_string(),
            bucket: "my-bucket".to_string(),
            google_cloud_storage_conn_id: "gcs-default".to_string(),
            source_conn_id: "github-default".to_string(),
            mime_type: None,
            delegate_to: None,
            gzip: false,
        }
    }

    #[test]
    fn from_value_minimal() {
        let request = TransferRequest::from_value(json!({
            "src": "README.md",
            "dst": "backups/readme.md",
            "bucket": "my-bucket",
            "google_cloud_storage_conn_id": "gcs-default",
            "source_conn_id": "github-default",
        }))
        .unwrap();
        assert_eq!(request.mime_type, None);
        assert_eq!(request.delegate_to, None);
        assert!(!request.gzip);
    }

    #[test]
    fn from_value_missing_field() {
        let err = TransferRequest::from_value(json!({
            "src": "README.md",
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn validate_ok() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn validate_names_the_empty_field() {
        let mut request = valid_request();
        request.bucket = String::new();
        match request.validate() {
            Err(TransferError::InvalidRequest(msg)) => {
                assert_eq!(msg, "bucket must be non-empty")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn validate_empty_src() {
        let mut request = valid_request();
        request.src = String::new();
        assert!(matches!(
            request.validate(),
            Err(TransferError::InvalidRequest(_))
        ));
    }

    #[test]
    fn source_path_shorthand() {
        let mut request = valid_request();
        request.src = "commits:octocat/hello-world".to_string();
        assert_eq!(request.source_path().unwrap(), "repos/octocat/hello-world/commits");
    }

    #[test]
    fn source_path_malformed_shorthand() {
        let mut request = valid_request();
        request.src = "gists:octocat/hello-world".to_string();
        let err = request.source_path().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
}
