//! Runtime configuration loaded from an optional YAML file.
//!
//! Every field has a default, so an empty file (or no file at all) is a valid
//! configuration. Provider credentials usually come from the environment via
//! the CLI (`AZURE_LANGUAGE_ENDPOINT`, `AZURE_LANGUAGE_KEY`) and override the
//! values in the file.
//!
//! ```yaml
//! azure:
//!   endpoint: https://my-resource.cognitiveservices.azure.com
//!   key: "<secret>"
//! cache:
//!   analysis_ttl_secs: 3600
//!   extraction_ttl_secs: 1800
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error(
        "missing language service credentials: set AZURE_LANGUAGE_ENDPOINT and AZURE_LANGUAGE_KEY \
         or the azure section of the config file"
    )]
    MissingCredentials,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub azure: AzureConfig,
    pub http: HttpConfig,
    pub cache: CacheConfig,
    pub retry: RetryConfig,
    pub summary: SummaryConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureConfig {
    pub endpoint: Option<String>,
    pub key: Option<String>,
    pub api_version: String,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            key: None,
            api_version: "2023-04-01".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "analizador-noticias/1.0".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub analysis_ttl_secs: i64,
    pub extraction_ttl_secs: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            analysis_ttl_secs: 3600,
            extraction_ttl_secs: 1800,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub sentence_count: usize,
    pub poll_interval_ms: u64,
    pub max_wait_secs: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            sentence_count: 3,
            poll_interval_ms: 1000,
            max_wait_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub max_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self { max_chars: 5000 }
    }
}

/// Endpoint and key for the language service, both guaranteed non-empty.
#[derive(Clone)]
pub struct Credentials {
    pub endpoint: String,
    pub key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl AppConfig {
    /// Load the configuration from `path`, or defaults when `path` is `None`.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(Path::new(path)).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        info!(path, "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to null, not to a mapping.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Replace file credentials with the ones given on the command line or environment.
    pub fn with_credential_overrides(mut self, endpoint: Option<String>, key: Option<String>) -> Self {
        if endpoint.is_some() {
            self.azure.endpoint = endpoint;
        }
        if key.is_some() {
            self.azure.key = key;
        }
        self
    }

    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        match (non_empty(&self.azure.endpoint), non_empty(&self.azure.key)) {
            (Some(endpoint), Some(key)) => Ok(Credentials {
                endpoint: endpoint.trim_end_matches('/').to_string(),
                key,
            }),
            _ => Err(ConfigError::MissingCredentials),
        }
    }
}
