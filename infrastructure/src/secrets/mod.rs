//! Credential lookup for reviewer providers.
//!
//! Keys are resolved from the process environment first, then from a
//! `.env` file under the user config directory. Raw key material is
//! never logged; only presence is reported at debug level.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves per-provider API keys for reviewer construction.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyStore {
    env_file: Option<PathBuf>,
}

impl ApiKeyStore {
    /// Store backed by the standard `.env` location,
    /// `$XDG_CONFIG_HOME/config-council/.env`.
    pub fn from_config_dir() -> Self {
        Self {
            env_file: dirs::config_dir().map(|d| d.join("config-council").join(".env")),
        }
    }

    /// Store backed by an explicit `.env` file (used in tests).
    pub fn with_env_file(path: impl Into<PathBuf>) -> Self {
        Self {
            env_file: Some(path.into()),
        }
    }

    /// Look up a key by its environment variable name.
    pub fn resolve(&self, env_var: &str) -> Option<String> {
        if let Ok(value) = std::env::var(env_var)
            && !value.trim().is_empty()
        {
            debug!(env_var, "credential resolved from environment");
            return Some(value);
        }

        let value = self
            .env_file
            .as_deref()
            .and_then(|path| Self::lookup_env_file(path, env_var));
        if value.is_some() {
            debug!(env_var, "credential resolved from .env file");
        }
        value
    }

    pub fn has(&self, env_var: &str) -> bool {
        self.resolve(env_var).is_some()
    }

    /// Parse a `KEY=value` file, tolerating comments, blank lines, an
    /// optional `export ` prefix, and single or double quotes.
    fn lookup_env_file(path: &Path, env_var: &str) -> Option<String> {
        let content = std::fs::read_to_string(path).ok()?;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key.trim() != env_var {
                continue;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
        None
    }
}
