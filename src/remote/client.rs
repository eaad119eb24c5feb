use crate::core::{RigupError, RigupResult};
use crate::di::FileSource;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Client for the curated file server
///
/// The server exposes two endpoints:
/// - `GET <base>/getAll` returns a JSON array of relative paths
/// - `GET <base>/getFile/<path>` returns the raw bytes of one file
pub struct HttpFileSource {
    client: Client,
    base_url: String,
}

impl HttpFileSource {
    /// Create a new client for `base_url`
    pub fn new(base_url: &str) -> RigupResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("rigup/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the listing endpoint
    pub fn listing_url(&self) -> String {
        format!("{}/getAll", self.base_url)
    }

    /// URL of one hosted file, with every path segment percent-encoded
    pub fn file_url(&self, entry: &str) -> String {
        let encoded: Vec<String> = entry
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/getFile/{}", self.base_url, encoded.join("/"))
    }

    /// Fetch the file listing
    pub async fn fetch_listing(&self) -> RigupResult<Vec<String>> {
        let url = self.listing_url();
        debug!(%url, "Requesting file listing");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RigupError::ManifestFetch(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RigupError::ManifestFetch(format!("{} returned {}", url, status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RigupError::ManifestFetch(format!("{}: {}", url, e)))?;

        serde_json::from_slice::<Vec<String>>(&body)
            .map_err(|e| RigupError::ManifestFetch(format!("malformed listing from {}: {}", url, e)))
    }

    /// Download one file to `dest`
    ///
    /// A failed transfer removes whatever was written to `dest`.
    pub async fn fetch_file(&self, entry: &str, dest: &Path) -> RigupResult<u64> {
        let url = self.file_url(entry);
        debug!(%url, dest = %dest.display(), "Downloading file");

        let mut response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RigupError::item(entry, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RigupError::item(entry, format!("HTTP {}", status)));
        }

        let mut file = File::create(dest)
            .await
            .map_err(|e| RigupError::item(entry, e))?;

        let outcome = stream_body(&mut response, &mut file).await;
        drop(file);

        match outcome {
            Ok(written) => Ok(written),
            Err(e) => {
                let _ = tokio::fs::remove_file(dest).await; // partial file
                Err(RigupError::item(entry, e))
            }
        }
    }
}

async fn stream_body(response: &mut Response, file: &mut File) -> RigupResult<u64> {
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

// Implement FileSource trait
#[async_trait]
impl FileSource for HttpFileSource {
    async fn fetch_listing(&self) -> RigupResult<Vec<String>> {
        self.fetch_listing().await
    }

    async fn fetch_file(&self, entry: &str, dest: &Path) -> RigupResult<u64> {
        self.fetch_file(entry, dest).await
    }
}
