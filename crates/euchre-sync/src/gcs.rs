//! Google Cloud Storage mirror over the JSON API.

use crate::credentials::{Credentials, TokenSource};
use crate::{RemoteMirror, SyncError, SyncResult};
use euchre_config_and_utils::SyncConfig;
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";

/// One object in one bucket holding the store snapshot.
pub struct GcsMirror {
    client: Client,
    tokens: TokenSource,
    endpoint: String,
    bucket: String,
    object_key: String,
}

impl GcsMirror {
    /// Build a mirror from configuration, resolving credentials from the
    /// environment and the configured key file.
    pub fn from_config(config: &SyncConfig) -> SyncResult<Self> {
        let credentials = Credentials::resolve(config.credentials_file.as_deref())?;
        info!(
            bucket = %config.bucket,
            object = %config.object_key,
            credentials = credentials.kind(),
            "Remote mirror configured"
        );
        Self::new(config, credentials)
    }

    pub fn new(config: &SyncConfig, credentials: Credentials) -> SyncResult<Self> {
        if config.bucket.trim().is_empty() {
            return Err(SyncError::Config("bucket must not be empty".to_string()));
        }
        if config.object_key.trim().is_empty() {
            return Err(SyncError::Config("object key must not be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            tokens: TokenSource::new(credentials),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            bucket: config.bucket.clone(),
            object_key: config.object_key.clone(),
        })
    }

    /// Point at a different API host (emulators, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, segments: &[&str]) -> SyncResult<Url> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| SyncError::Config(format!("invalid endpoint {}: {}", self.endpoint, e)))?;
        url.path_segments_mut()
            .map_err(|_| SyncError::Config(format!("endpoint {} cannot hold a path", self.endpoint)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn media_url(&self) -> SyncResult<Url> {
        let mut url = self.url(&["storage", "v1", "b", &self.bucket, "o", &self.object_key])?;
        url.query_pairs_mut().append_pair("alt", "media");
        Ok(url)
    }

    fn upload_url(&self) -> SyncResult<Url> {
        let mut url = self.url(&["upload", "storage", "v1", "b", &self.bucket, "o"])?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", &self.object_key);
        Ok(url)
    }
}

impl RemoteMirror for GcsMirror {
    fn download(&self) -> SyncResult<Option<Vec<u8>>> {
        let token = self.tokens.token(&self.client)?;
        let response = self
            .client
            .get(self.media_url()?)
            .bearer_auth(token)
            .send()?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(object = %self.describe(), "No remote snapshot");
            return Ok(None);
        }
        let response = check_status(response)?;
        let bytes = response.bytes()?;
        debug!(object = %self.describe(), bytes = bytes.len(), "Snapshot downloaded");
        Ok(Some(bytes.to_vec()))
    }

    fn upload(&self, snapshot: &[u8]) -> SyncResult<()> {
        let token = self.tokens.token(&self.client)?;
        let response = self
            .client
            .post(self.upload_url()?)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(snapshot.to_vec())
            .send()?;
        check_status(response)?;
        debug!(object = %self.describe(), bytes = snapshot.len(), "Snapshot uploaded");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.object_key)
    }
}

fn check_status(response: Response) -> SyncResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(SyncError::Status {
        status: status.as_u16(),
        body: response.text().unwrap_or_default(),
    })
}
