//! Configuration file handling for the solaredge CLI

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use solaredge_client::{DEFAULT_BASE_URL, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_TIMEOUT};

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Monitoring API key
    pub api_key: Option<String>,
    /// API endpoint override
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Size of the request permit pool
    pub max_concurrent_requests: Option<usize>,
    /// Pretty-print JSON output
    pub pretty: Option<bool>,
}

/// Values given on the command line (or through the environment)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides<'a> {
    pub api_key: Option<&'a str>,
    pub base_url: Option<&'a str>,
    pub timeout_secs: Option<u64>,
    pub max_concurrent_requests: Option<usize>,
    pub pretty: bool,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("solaredge");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(&self, args: &CliOverrides<'_>) -> Result<MergedConfig> {
        let api_key = args
            .api_key
            .map(String::from)
            .or_else(|| self.api_key.clone());
        let Some(api_key) = api_key else {
            bail!("No API key given; pass --api-key, set SOLAREDGE_API_KEY or add api_key to the config file");
        };

        Ok(MergedConfig {
            api_key,
            base_url: args
                .base_url
                .map(String::from)
                .or_else(|| self.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: args
                .timeout_secs
                .or(self.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            max_concurrent_requests: args
                .max_concurrent_requests
                .or(self.max_concurrent_requests)
                .unwrap_or(DEFAULT_MAX_CONCURRENT_REQUESTS),
            pretty: args.pretty || self.pretty.unwrap_or(false),
        })
    }
}

/// Fully resolved configuration after merging CLI args
#[derive(Clone)]
pub struct MergedConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_concurrent_requests: usize,
    pub pretty: bool,
}

impl fmt::Debug for MergedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergedConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("pretty", &self.pretty)
            .finish()
    }
}
