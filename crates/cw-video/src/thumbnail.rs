//! Thumbnail lookup.

use std::time::Duration;

use serde::Deserialize;
use ureq::Agent;

use crate::consts::{DEFAULT_TIMEOUT, VIMEO_THUMBNAIL_API_URL};

/// Thumbnail lookup error.
#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("no thumbnail in response")]
    Missing,
}

/// Looks up the thumbnail URL of a hosted video.
///
/// Implementations must be shareable across module compiles running in
/// parallel.
pub trait ThumbnailFetcher: Send + Sync {
    /// Return the thumbnail URL for a provider video id.
    fn fetch(&self, video_id: &str) -> Result<String, ThumbnailError>;
}

#[derive(Deserialize)]
struct VimeoVideo {
    thumbnail_large: Option<String>,
}

/// Vimeo thumbnails via the simple API (`{api_url}{id}.json`).
pub struct VimeoThumbnails {
    agent: Agent,
    api_url: String,
}

impl VimeoThumbnails {
    /// Create a fetcher against the public API with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(VIMEO_THUMBNAIL_API_URL, DEFAULT_TIMEOUT)
    }

    /// Create a fetcher with a custom API prefix and timeout.
    #[must_use]
    pub fn with_config(api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: create_agent(timeout),
            api_url: api_url.into(),
        }
    }
}

impl Default for VimeoThumbnails {
    fn default() -> Self {
        Self::new()
    }
}

impl ThumbnailFetcher for VimeoThumbnails {
    fn fetch(&self, video_id: &str) -> Result<String, ThumbnailError> {
        let url = format!("{}{video_id}.json", self.api_url);
        tracing::debug!(url = %url, "Fetching video thumbnail");

        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| ThumbnailError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(ThumbnailError::Status(status));
        }

        let videos: Vec<VimeoVideo> = response
            .into_body()
            .read_json()
            .map_err(|e| ThumbnailError::Decode(e.to_string()))?;

        videos
            .into_iter()
            .next()
            .and_then(|video| video.thumbnail_large)
            .map(|link| link.replace("webp", "jpg"))
            .ok_or(ThumbnailError::Missing)
    }
}

/// Create HTTP agent with the specified timeout.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}
