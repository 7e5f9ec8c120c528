//! Artifact fetching over HTTP with retry on transient failures

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use super::config::ClientConfig;
use super::ArtifactFetcher;
use crate::errors::{FetchError, FetchResult};

/// Fetches artifacts relative to a base URL
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
    config: ClientConfig,
}

impl HttpFetcher {
    /// Creates a fetcher rooted at `base_url`
    ///
    /// A trailing slash is added to the base so artifact names resolve inside
    /// it rather than replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if `base_url` does not parse, or
    /// `FetchError::Http` if the client cannot be built.
    pub fn new(base_url: &str, config: ClientConfig) -> FetchResult<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| FetchError::InvalidUrl {
            url: base_url.to_string(),
            error: e.to_string(),
        })?;
        let client = config.build_http_client()?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Resolve an artifact name against the base URL
    pub fn artifact_url(&self, name: &str) -> FetchResult<Url> {
        self.base_url.join(name).map_err(|e| FetchError::InvalidUrl {
            url: format!("{}{}", self.base_url, name),
            error: e.to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_text(&self, url: &Url) -> FetchResult<String> {
        let mut retries = 0;
        loop {
            match self.client.get(url.as_str()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let text = response.text().await?;
                        tracing::debug!("Fetched {} ({} bytes)", url, text.len());
                        return Ok(text);
                    }

                    let transient = status == StatusCode::TOO_MANY_REQUESTS
                        || status == StatusCode::SERVICE_UNAVAILABLE;
                    if transient && retries < self.config.max_retries {
                        retries += 1;
                        let delay = self.config.retry_delay(retries);
                        tracing::warn!(
                            "HTTP {} for {}. Backing off for {}ms",
                            status.as_u16(),
                            url,
                            delay.as_millis()
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Err(FetchError::Status {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(e) if retries < self.config.max_retries => {
                    retries += 1;
                    let delay = self.config.retry_delay(retries);
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {}. Retrying in {}ms",
                        retries,
                        self.config.max_retries,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!("Request to {} failed after {} retries: {}", url, retries, e);
                    if retries == 0 {
                        return Err(FetchError::Http(e));
                    }
                    return Err(FetchError::MaxRetriesExceeded {
                        max_retries: self.config.max_retries,
                        url: url.to_string(),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl ArtifactFetcher for HttpFetcher {
    async fn fetch(&self, name: &str) -> FetchResult<String> {
        let url = self.artifact_url(name)?;
        self.get_text(&url).await
    }

    fn describe(&self) -> String {
        self.base_url.to_string()
    }
}
