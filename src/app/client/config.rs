//! HTTP client configuration and building logic

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::{http, limits};
use crate::errors::{FetchError, FetchResult};

/// Configuration for the artifact HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Request timeout
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry attempts for transient failures (429, 503, transport errors)
    pub max_retries: u32,
    /// Base delay of the exponential backoff
    pub retry_base_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            max_retries: limits::MAX_RETRIES,
            retry_base_delay: Duration::from_millis(limits::RETRY_BASE_DELAY_MS),
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> FetchResult<Client> {
        Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(http::USER_AGENT)
            .build()
            .map_err(FetchError::Http)
    }

    /// Backoff delay before retry number `attempt` (1-based)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        self.retry_base_delay * 2_u32.saturating_pow(attempt.saturating_sub(1))
    }
}
