//! Configuration types for notecraft.
//!
//! Settings are loaded from `notecraft.toml`. Every section and field is
//! optional and falls back to a default suitable for local use:
//!
//! - [`Config`] - Root configuration struct
//! - [`ServerConfig`] - HTTP bind address
//! - [`StorageConfig`] - Data directory and catalog backend
//! - [`GenerationConfig`] - Image model endpoint, credentials and timeout
//! - [`MetricsConfig`] / [`LoggingConfig`] - Observability switches

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// notecraft.toml configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which catalog backend persists the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Single `db.json` file, replaced atomically on every save.
    #[default]
    Json,
    /// Embedded redb database holding the snapshot in one table.
    Redb,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub backend: BackendKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GenerationConfig {
    /// Timeout applied to each image model call.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read the API key from the configured environment variable.
    ///
    /// Returns `None` when the variable is unset or empty.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> String {
    constants::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    constants::DEFAULT_PORT
}

fn default_model() -> String {
    constants::DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    constants::DEFAULT_API_BASE.to_string()
}

fn default_api_key_env() -> String {
    constants::DEFAULT_API_KEY_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    constants::DEFAULT_GENERATION_TIMEOUT_SECS
}

impl Config {
    /// Load configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - A field has an invalid type or an unknown section is present
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load `path` if given, else `notecraft.toml` if present, else defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file is missing, or if any
    /// file that exists fails to parse.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let default_path = Path::new(constants::CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from(default_path)
                } else {
                    Ok(Self::default())
                }
            },
        }
    }

    /// Validate configuration with comprehensive checks.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error listing every problem found:
    /// - Port 0 or empty host
    /// - Empty model name or API key variable name
    /// - API base that is not an http(s) URL
    /// - Zero generation timeout
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        // 1. Server
        if self.server.port == 0 {
            errors.push(
                "Server port cannot be 0. Use a valid port number (1-65535)\n  \
                 Common ports: 3000 (default), 8080, 8000"
                    .to_string(),
            );
        }
        if self.server.port < 1024 && self.server.port > 0 {
            warnings.push(format!(
                "Server port {} is a system/privileged port (< 1024)\n  \
                 Recommendation: Use ports >= 1024 (e.g., 3000, 8080) to avoid permission issues",
                self.server.port
            ));
        }
        if self.server.host.trim().is_empty() {
            errors.push("server.host cannot be empty".to_string());
        }

        // 2. Storage
        if let Some(dir) = &self.storage.data_dir
            && !dir.trim().is_empty()
        {
            let path = Path::new(dir);
            if path.exists() && !path.is_dir() {
                errors.push(format!("Data path is not a directory: {dir}"));
            }
        }

        // 3. Generation
        if self.generation.model.trim().is_empty() {
            errors.push("generation.model cannot be empty".to_string());
        }
        if self.generation.api_key_env.trim().is_empty() {
            errors.push("generation.api_key_env cannot be empty".to_string());
        }
        match url::Url::parse(&self.generation.api_base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                if url.scheme() == "http" {
                    warnings.push(format!(
                        "generation.api_base uses plain http: {}\n  \
                         The API key will be sent unencrypted",
                        self.generation.api_base
                    ));
                }
            },
            Ok(url) => errors.push(format!(
                "generation.api_base must be an http(s) URL (got scheme '{}')",
                url.scheme()
            )),
            Err(e) => errors.push(format!(
                "generation.api_base is not a valid URL '{}': {e}",
                self.generation.api_base
            )),
        }
        if self.generation.timeout_secs == 0 {
            errors.push(
                "generation.timeout_secs cannot be 0. Image generation usually takes 10-60s"
                    .to_string(),
            );
        } else if self.generation.timeout_secs > 600 {
            warnings.push(format!(
                "generation.timeout_secs {} is very high (> 600)\n  \
                 Stuck model calls will hold client connections open that long",
                self.generation.timeout_secs
            ));
        }
        if self.generation.api_key().is_none() {
            warnings.push(format!(
                "Environment variable {} is not set; generate and edit requests will fail",
                self.generation.api_key_env
            ));
        }

        if !errors.is_empty() {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }

        Ok(ValidationResult { warnings })
    }
}
