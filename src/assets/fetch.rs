//! Byte fetching for album art and letter backgrounds.

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::foundation::error::{KeepsakeError, KeepsakeResult};

/// Source of remote or local asset bytes.
pub trait AssetFetcher: Send + Sync {
    /// Fetch the bytes behind `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = KeepsakeResult<Vec<u8>>> + Send;
}

/// Fetches `http(s)` URLs with `reqwest` and reads anything else from the filesystem.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_bytes: usize,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, max_bytes: usize) -> KeepsakeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| KeepsakeError::fetch(format!("cannot build http client: {e}")))?;
        Ok(Self {
            client,
            timeout,
            max_bytes,
        })
    }

    pub fn from_config(config: &EngineConfig) -> KeepsakeResult<Self> {
        Self::new(config.fetch_timeout(), config.max_asset_bytes)
    }

    async fn fetch_http(&self, url: &str) -> KeepsakeResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(KeepsakeError::fetch(format!(
                "HTTP {} for {url}",
                status.as_u16()
            )));
        }
        if let Some(len) = response.content_length()
            && len > self.max_bytes as u64
        {
            return Err(KeepsakeError::fetch(format!(
                "{url} is {len} bytes, limit is {}",
                self.max_bytes
            )));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;
        self.check_len(url, body.len())?;
        Ok(body.to_vec())
    }

    async fn fetch_file(&self, path: &Path) -> KeepsakeResult<Vec<u8>> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            KeepsakeError::fetch(format!("cannot read {}: {e}", path.display()))
        })?;
        self.check_len(&path.display().to_string(), bytes.len())?;
        Ok(bytes)
    }

    fn check_len(&self, what: &str, len: usize) -> KeepsakeResult<()> {
        if len > self.max_bytes {
            return Err(KeepsakeError::fetch(format!(
                "{what} is {len} bytes, limit is {}",
                self.max_bytes
            )));
        }
        Ok(())
    }

    fn map_reqwest_error(&self, e: reqwest::Error) -> KeepsakeError {
        if e.is_timeout() {
            KeepsakeError::fetch(format!("timed out after {:?}", self.timeout))
        } else if e.is_connect() {
            KeepsakeError::fetch(format!("cannot connect: {e}"))
        } else {
            KeepsakeError::fetch(format!("request failed: {e}"))
        }
    }
}

impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> KeepsakeResult<Vec<u8>> {
        if is_http(url) {
            self.fetch_http(url).await
        } else {
            let path = url.strip_prefix("file://").unwrap_or(url);
            self.fetch_file(Path::new(path)).await
        }
    }
}

fn is_http(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Fixed URL-to-bytes table; unknown URLs fail like an unreachable host.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFetcher {
    assets: HashMap<String, Vec<u8>>,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `url`.
    pub fn with(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.assets.insert(url.into(), bytes);
        self
    }
}

impl AssetFetcher for InMemoryFetcher {
    async fn fetch(&self, url: &str) -> KeepsakeResult<Vec<u8>> {
        self.assets
            .get(url)
            .cloned()
            .ok_or_else(|| KeepsakeError::fetch(format!("no asset registered for {url}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
