//! Artifact fetchers
//!
//! The loader retrieves each artifact through an [`ArtifactFetcher`]:
//! - `http`: artifacts published under a base URL, configured by `config`
//! - `directory`: artifacts in a local directory

use async_trait::async_trait;

use crate::errors::FetchResult;

pub mod config;
pub mod directory;
pub mod http;

pub use config::ClientConfig;
pub use directory::DirectoryFetcher;
pub use http::HttpFetcher;

/// Source of raw artifact text
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Fetch the artifact called `name`
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on network failure, non-success status or a
    /// missing file.
    async fn fetch(&self, name: &str) -> FetchResult<String>;

    /// Human-readable location, for logging
    fn describe(&self) -> String;
}
