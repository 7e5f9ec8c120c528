//! Configuration management for the case-document dashboard
//!
//! Configuration is read from TOML. Every section is optional; missing
//! sections and fields take the defaults below, so an empty file is a valid
//! configuration that reads the artifacts from the current directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use crate::app::client::{ArtifactFetcher, ClientConfig, DirectoryFetcher, HttpFetcher};
use crate::app::loader::ArtifactNames;
use crate::constants::{config_files, http, limits, logging, ui};
use crate::errors::{AppError, ConfigError, ConfigResult, Result};

/// Dashboard configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Where artifacts are fetched from
    pub source: SourceConfig,
    /// Artifact file names
    pub artifacts: ArtifactNames,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Interaction settings
    pub ui: UiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Artifact source: a base URL or a local directory, not both
///
/// Without a `[source]` section the current directory is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL the artifacts are published under
    pub base_url: Option<String>,
    /// Directory holding the artifacts
    pub data_dir: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            data_dir: Some(PathBuf::from(".")),
        }
    }
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Retries for 429/503 and transport errors
    pub max_retries: u32,
    /// Base delay of the exponential backoff in milliseconds
    pub retry_base_delay_ms: u64,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            max_retries: limits::MAX_RETRIES,
            retry_base_delay_ms: limits::RETRY_BASE_DELAY_MS,
        }
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            max_retries: self.max_retries,
            retry_base_delay: Duration::from_millis(self.retry_base_delay_ms),
        }
    }
}

/// Interaction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Debounce quantum for recompute triggers, in milliseconds
    pub debounce_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            debounce_ms: ui::DEBOUNCE_QUANTUM.as_millis() as u64,
        }
    }
}

impl UiConfig {
    /// Debounce quantum as a Duration
    pub fn debounce_quantum(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level for this crate
    pub level: String,
    /// Include the event target in log lines
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LEVEL.to_string(),
            with_target: false,
        }
    }
}

impl LoggingConfig {
    /// Filter directive for the configured level
    pub fn directive(&self) -> String {
        format!("{}={}", logging::CRATE_TARGET, self.level)
    }

    /// Install a global fmt subscriber
    ///
    /// # Errors
    ///
    /// Fails if the level is not a valid filter or a global subscriber is
    /// already installed.
    pub fn init(&self) -> Result<()> {
        let filter = EnvFilter::try_new(self.directive()).map_err(|e| {
            ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                value: self.level.clone(),
                reason: e.to_string(),
            }
        })?;

        fmt()
            .with_env_filter(filter)
            .with_target(self.with_target)
            .try_init()
            .map_err(|e| AppError::generic(format!("Failed to initialize logging: {}", e)))
    }
}

impl DashboardConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and defaults are used when nothing is found. The result is
    /// validated before it is returned.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        let config = match path {
            Some(path) => Self::load_from_file(&path).await?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(config_files::LOCAL_FILE)];
        search_paths.extend(Self::default_config_path());

        search_paths.into_iter().find(|path| {
            let found = path.exists();
            if found {
                debug!("Found config file: {}", path.display());
            }
            found
        })
    }

    /// Per-user config file location, if the platform has one
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(config_files::DIR_NAME).join(config_files::FILE_NAME))
    }

    /// Check cross-field constraints, reporting every problem at once
    pub fn validate(&self) -> ConfigResult<()> {
        let mut errors = Vec::new();

        match (&self.source.base_url, &self.source.data_dir) {
            (Some(_), Some(_)) => {
                errors.push("source: set either base_url or data_dir, not both".to_string())
            }
            (None, None) => errors.push("source: one of base_url or data_dir is required".to_string()),
            (Some(url), None) if url.trim().is_empty() => {
                errors.push("source.base_url must not be empty".to_string())
            }
            _ => {}
        }

        for (field, name) in [
            ("artifacts.rows", &self.artifacts.rows),
            ("artifacts.audit", &self.artifacts.audit),
            ("artifacts.parser_report", &self.artifacts.parser_report),
        ] {
            if name.trim().is_empty() {
                errors.push(format!("{} must not be empty", field));
            }
        }

        if self.client.request_timeout_secs == 0 {
            errors.push("client.request_timeout_secs must be positive".to_string());
        }
        if self.client.connect_timeout_secs == 0 {
            errors.push("client.connect_timeout_secs must be positive".to_string());
        }
        if self.client.max_retries > limits::MAX_CONFIGURABLE_RETRIES {
            errors.push(format!(
                "client.max_retries must be at most {}",
                limits::MAX_CONFIGURABLE_RETRIES
            ));
        }

        if self.ui.debounce_ms == 0 {
            errors.push("ui.debounce_ms must be positive".to_string());
        }

        if !logging::LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "logging.level must be one of {}",
                logging::LEVELS.join(", ")
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationFailed { errors })
        }
    }

    /// Build the fetcher for the configured source
    pub fn build_fetcher(&self) -> ConfigResult<Arc<dyn ArtifactFetcher>> {
        self.validate()?;

        if let Some(url) = &self.source.base_url {
            let fetcher = HttpFetcher::new(url, self.client.to_runtime_config()).map_err(|e| {
                ConfigError::InvalidValue {
                    field: "source.base_url".to_string(),
                    value: url.clone(),
                    reason: e.to_string(),
                }
            })?;
            return Ok(Arc::new(fetcher));
        }

        let dir = self.source.data_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        Ok(Arc::new(DirectoryFetcher::new(dir)))
    }

    /// Default configuration file content with comments
    pub fn generate_default_config_content() -> String {
        format!(
            r#"# Case Document Dashboard Configuration
# Every setting is optional; the values below are the defaults.

[source]
# Read artifacts from a directory...
data_dir = "."
# ...or from a base URL (set exactly one of the two)
# base_url = "https://example.org/pipeline-output/"

[artifacts]
rows = "{}"
audit = "{}"
parser_report = "{}"

[client]
request_timeout_secs = {}
connect_timeout_secs = {}
max_retries = {}  # retried on 429, 503 and transport errors
retry_base_delay_ms = {}

[ui]
debounce_ms = {}

[logging]
level = "{}"  # error, warn, info, debug, trace
with_target = false
"#,
            ArtifactNames::default().rows,
            ArtifactNames::default().audit,
            ArtifactNames::default().parser_report,
            http::DEFAULT_TIMEOUT.as_secs(),
            http::CONNECT_TIMEOUT.as_secs(),
            limits::MAX_RETRIES,
            limits::RETRY_BASE_DELAY_MS,
            ui::DEBOUNCE_QUANTUM.as_millis(),
            logging::DEFAULT_LEVEL,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::artifacts;
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.source.data_dir, Some(PathBuf::from(".")));
        assert_eq!(config.artifacts.rows, artifacts::ROWS_FILE);
        assert_eq!(config.client.max_retries, limits::MAX_RETRIES);
        assert_eq!(config.ui.debounce_quantum(), ui::DEBOUNCE_QUANTUM);
        assert_eq!(config.logging.level, "info");
        assert_ok!(config.validate());
    }

    #[test]
    fn test_generated_content_parses_to_defaults() {
        let content = DashboardConfig::generate_default_config_content();
        let parsed = DashboardConfig::from_toml_str(&content).unwrap();

        assert_eq!(parsed, DashboardConfig::default());
        assert!(content.contains("# Case Document Dashboard Configuration"));
        assert!(content.contains("[source]"));
        assert!(content.contains("[ui]"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = DashboardConfig::from_toml_str(
            r#"
[source]
base_url = "http://localhost:8000/out"

[ui]
debounce_ms = 250
"#,
        )
        .unwrap();

        assert_eq!(config.source.data_dir, None);
        assert_ok!(config.validate());
        assert_eq!(config.ui.debounce_ms, 250);
        assert_eq!(config.client, ClientConfigToml::default());
        assert_eq!(config.artifacts, ArtifactNames::default());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = DashboardConfig::default();
        config.source.base_url = Some("http://localhost".to_string());
        config.artifacts.audit = " ".to_string();
        config.ui.debounce_ms = 0;
        config.logging.level = "loud".to_string();

        match config.validate() {
            Err(ConfigError::ValidationFailed { errors }) => {
                assert_eq!(errors.len(), 4);
                assert!(errors[0].contains("not both"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_source_rejected() {
        let config = DashboardConfig {
            source: SourceConfig {
                base_url: None,
                data_dir: None,
            },
            ..Default::default()
        };
        assert_err!(config.validate());
        assert!(config.build_fetcher().is_err());
    }

    #[test]
    fn test_build_fetcher_for_each_source() {
        let config = DashboardConfig::default();
        assert!(config.build_fetcher().unwrap().describe().contains('.'));

        let config = DashboardConfig {
            source: SourceConfig {
                base_url: Some("http://localhost:8000/out".to_string()),
                data_dir: None,
            },
            ..Default::default()
        };
        let fetcher = config.build_fetcher().unwrap();
        assert!(fetcher.describe().starts_with("http://localhost:8000/out/"));

        let config = DashboardConfig {
            source: SourceConfig {
                base_url: Some("not a url".to_string()),
                data_dir: None,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.build_fetcher(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_logging_directive() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            with_target: true,
        };
        assert_eq!(logging.directive(), "casedoc_dashboard=debug");
    }

    #[tokio::test]
    async fn test_config_loading_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let result = DashboardConfig::load(Some(config_path)).await;
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_config_loading_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("dashboard.toml");
        tokio::fs::write(
            &config_path,
            r#"
[artifacts]
rows = "rows.csv"

[logging]
level = "debug"
"#,
        )
        .await
        .unwrap();

        let config = DashboardConfig::load(Some(config_path)).await.unwrap();
        assert_eq!(config.artifacts.rows, "rows.csv");
        assert_eq!(config.artifacts.audit, artifacts::AUDIT_FILE);
        assert_eq!(config.logging.level, "debug");
    }

    #[tokio::test]
    async fn test_invalid_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        tokio::fs::write(&config_path, "[ui]\ndebounce_ms = \"soon\"\n")
            .await
            .unwrap();

        let result = DashboardConfig::load(Some(config_path)).await;
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }
}
