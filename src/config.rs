//! Logging configuration file.
//!
//! The binary accepts `--logging-conf PATH` (default `logging.toml`). The
//! file is looked up as given and then next to the executable. Values can
//! be overridden with `DUPEWALK_LOG_*` environment variables.
//!
//! ```toml
//! # logging.toml
//! level = "info,dupewalk::scanner=debug"
//! timestamps = true
//! module_path = false
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Environment variable prefix for logging overrides.
pub const ENV_PREFIX: &str = "DUPEWALK_LOG_";

/// Logging settings read from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// env_logger filter directives, e.g. `"warn"` or `"info,dupewalk::scanner=trace"`
    #[serde(default)]
    pub level: Option<String>,
    /// Prefix each line with a timestamp.
    #[serde(default = "default_true")]
    pub timestamps: bool,
    /// Include the module path of the log call.
    #[serde(default)]
    pub module_path: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            timestamps: true,
            module_path: false,
        }
    }
}

impl LoggingConfig {
    /// Load the config at `path`, layered over defaults and under
    /// `DUPEWALK_LOG_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or holds values of the
    /// wrong type.
    pub fn load(path: &Path) -> Result<Self> {
        Figment::from(Serialized::defaults(LoggingConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .with_context(|| format!("Invalid logging config {}", path.display()))
    }

    /// Defaults with `DUPEWALK_LOG_*` environment overrides and no file.
    ///
    /// # Errors
    ///
    /// Returns an error if an override holds a value of the wrong type.
    pub fn from_env() -> Result<Self> {
        Figment::from(Serialized::defaults(LoggingConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .context("Invalid logging override in environment")
    }

    /// Locate and load the config named on the command line.
    ///
    /// The path is `None` when no file is found at either location; the
    /// environment overrides still apply in that case.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an override could not be loaded.
    pub fn discover(requested: &Path) -> Result<(Option<PathBuf>, Self)> {
        match locate(requested) {
            Some(path) => {
                let config = Self::load(&path)?;
                Ok((Some(path), config))
            }
            None => Ok((None, Self::from_env()?)),
        }
    }
}

/// Find the config file: as given, then relative to the executable.
#[must_use]
pub fn locate(requested: &Path) -> Option<PathBuf> {
    if requested.is_file() {
        return Some(requested.to_path_buf());
    }
    if requested.is_absolute() {
        return None;
    }

    let exe = std::env::current_exe().ok()?;
    let candidate = exe.parent()?.join(requested);
    candidate.is_file().then_some(candidate)
}
