//! Asset retrieval for embedded SVG emoji
//!
//! The `emojione-svg-embed` format inlines the SVG document of each emoji
//! instead of linking to it. The converter asks an [`AssetFetcher`] for the
//! bytes at a location (path or URL) and never touches the filesystem or the
//! network itself. Retrieval is synchronous: a conversion blocks until the
//! fetcher returns, and a failure aborts the conversion.
//!
//! Three implementations are provided:
//!
//! - [`FsAssetFetcher`]: reads local files, optionally below a root directory
//! - [`HttpAssetFetcher`]: performs HTTP GET requests via `ureq`
//! - [`DefaultAssetFetcher`]: routes `http://`/`https://` locations to HTTP
//!   and everything else to the filesystem

use std::path::{Path, PathBuf};
use std::time::Duration;

use ureq::Agent;

use crate::error::EmojiError;

/// Default timeout for remote asset requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of emoji asset bytes
pub trait AssetFetcher: Send + Sync {
    /// Fetch the asset at `location`
    ///
    /// # Errors
    ///
    /// Returns `EmojiError::AssetUnavailable` when the asset cannot be read.
    fn fetch(&self, location: &str) -> Result<Vec<u8>, EmojiError>;
}

/// Reads assets from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FsAssetFetcher {
    root: Option<PathBuf>,
}

impl FsAssetFetcher {
    /// Fetcher resolving locations as given
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetcher resolving relative locations below `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        let path = Path::new(location.strip_prefix("file://").unwrap_or(location));
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl AssetFetcher for FsAssetFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, EmojiError> {
        let path = self.resolve(location);
        std::fs::read(&path).map_err(|e| EmojiError::AssetUnavailable {
            location: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Fetches assets over HTTP
#[derive(Clone)]
pub struct HttpAssetFetcher {
    agent: Agent,
}

impl HttpAssetFetcher {
    /// Fetcher with [`DEFAULT_HTTP_TIMEOUT`]
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    /// Fetcher with a global per-request timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Default for HttpAssetFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetFetcher for HttpAssetFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, EmojiError> {
        let unavailable = |reason: String| EmojiError::AssetUnavailable {
            location: location.to_string(),
            reason,
        };

        let response = self
            .agent
            .get(location)
            .call()
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(unavailable(format!("HTTP {status}")));
        }

        let mut body = response.into_body();
        body.read_to_vec().map_err(|e| unavailable(e.to_string()))
    }
}

/// Routes remote locations to HTTP and local ones to the filesystem
#[derive(Clone, Default)]
pub struct DefaultAssetFetcher {
    fs: FsAssetFetcher,
    http: HttpAssetFetcher,
}

impl DefaultAssetFetcher {
    /// Create a routing fetcher with default settings
    pub fn new() -> Self {
        Self::default()
    }
}

/// Whether `location` must be fetched over the network
pub fn is_remote(location: &str) -> bool {
    let lower = location.get(..8).unwrap_or(location).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl AssetFetcher for DefaultAssetFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, EmojiError> {
        tracing::trace!(location, "Fetching emoji asset");
        if is_remote(location) {
            self.http.fetch(location)
        } else {
            self.fs.fetch(location)
        }
    }
}
