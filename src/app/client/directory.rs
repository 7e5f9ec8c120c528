//! Artifact fetching from a local published-data directory

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::ArtifactFetcher;
use crate::errors::{FetchError, FetchResult};

/// Reads artifacts from a directory such as the pipeline's `docs/data`
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    /// Creates a fetcher reading from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory artifacts are read from
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ArtifactFetcher for DirectoryFetcher {
    async fn fetch(&self, name: &str) -> FetchResult<String> {
        let path = self.root.join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                tracing::debug!("Read {} ({} bytes)", path.display(), text.len());
                Ok(text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound { path })
            }
            Err(e) => Err(FetchError::Io(e)),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
