//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML config file (platform config dir, or `--config PATH`)
//! 3. Environment variables prefixed with `SPOTCHECK_`
//! 4. CLI flags (applied by the caller)
//!
//! # Example
//!
//! ```toml
//! sample_count = 9
//! exact_threshold = 5000
//! source_dir = "SourceFiles"
//! io_threads = 4
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::checker::{CheckerConfig, DEFAULT_EXACT_THRESHOLD, DEFAULT_SOURCE_DIR};
use crate::sampler::DEFAULT_SAMPLE_COUNT;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "SPOTCHECK_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Samples taken per file in the sampled tier.
    pub sample_count: usize,
    /// Largest file length compared byte for byte.
    pub exact_threshold: u64,
    /// Batch source subfolder name.
    pub source_dir: String,
    /// I/O threads for batch checks.
    pub io_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            exact_threshold: DEFAULT_EXACT_THRESHOLD,
            source_dir: DEFAULT_SOURCE_DIR.to_string(),
            io_threads: 4,
        }
    }
}

/// Errors raised while loading or saving configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A provider produced a value of the wrong shape.
    #[error("Invalid configuration: {0}")]
    Load(#[from] figment::Error),

    /// A value is well-formed but unusable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Serializing the configuration failed.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Reading or writing the config file failed.
    #[error("Config file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Config {
    /// Load configuration from defaults, file and environment.
    ///
    /// # Arguments
    ///
    /// * `path` - Explicit config file. When `None`, the platform default
    ///   path is used if it exists.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if an explicit file is missing, a value has
    /// the wrong type, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
        }

        let config: Self = Self::figment(path).extract()?;
        config.validate()?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Build the layered figment without extracting it.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(file) => {
                log::trace!("Config file layer: {}", file.display());
                figment = figment.merge(Toml::file(file));
            }
            None => log::trace!("No config file layer"),
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Reject values the checker cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero sample count, zero I/O
    /// threads or an empty source directory name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_count == 0 {
            return Err(ConfigError::Invalid(
                "sample_count must be at least 1".to_string(),
            ));
        }
        if self.io_threads == 0 {
            return Err(ConfigError::Invalid(
                "io_threads must be at least 1".to_string(),
            ));
        }
        if self.source_dir.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "source_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Render the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save the configuration as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if serialization or writing fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        log::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "spotcheck", "spotcheck")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Build a checker configuration from these settings.
    #[must_use]
    pub fn checker_config(&self) -> CheckerConfig {
        CheckerConfig::default()
            .with_sample_count(self.sample_count)
            .with_exact_threshold(self.exact_threshold)
            .with_source_dir(self.source_dir.clone())
            .with_io_threads(self.io_threads)
    }
}
