//! Configuration management for wisp.
//!
//! Loads configuration from ${WISP_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_CHAT_MODEL;

/// Returns true when the process runs under the designated test
/// configuration (`WISP_TEST_MODE=1` or `true`).
///
/// Under test configuration the resolver uses the canned mock source
/// instead of real provider credentials.
pub fn is_test_environment() -> bool {
    std::env::var("WISP_TEST_MODE").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Per-provider configuration (credentials, endpoint override).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key. Falls back to the provider's environment variable.
    pub api_key: Option<String>,
    /// Endpoint override (env var takes precedence).
    pub base_url: Option<String>,
    /// Whether the provider is selectable. Defaults to enabled.
    pub enabled: Option<bool>,
}

/// Provider configuration table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub anthropic: ProviderConfig,
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default chat model (vendor-prefixed id from the registry).
    pub model: String,

    /// Maximum tokens for responses (optional)
    pub max_tokens: Option<u32>,

    /// Provider configuration (credentials, base URLs).
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
            max_tokens: None,
            providers: ProvidersConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for wisp configuration directories.
    //!
    //! WISP_HOME resolution order:
    //! 1. WISP_HOME environment variable (if set)
    //! 2. ~/.config/wisp (default)

    use std::path::PathBuf;

    /// Returns the wisp home directory.
    ///
    /// Checks WISP_HOME env var first, falls back to ~/.config/wisp
    ///
    /// # Panics
    /// Panics if the home directory cannot be determined.
    pub fn wisp_home() -> PathBuf {
        if let Ok(home) = std::env::var("WISP_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("wisp"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        wisp_home().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.max_tokens, None);
        assert!(config.providers.anthropic.api_key.is_none());
    }

    #[test]
    fn test_load_from_parses_provider_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            concat!(
                "model = \"anthropic/claude-sonnet-4-5\"\n",
                "max_tokens = 8192\n",
                "\n",
                "[providers.anthropic]\n",
                "api_key = \"sk-test\"\n",
                "base_url = \"http://localhost:8080\"\n",
            ),
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.model, "anthropic/claude-sonnet-4-5");
        assert_eq!(config.max_tokens, Some(8192));
        assert_eq!(config.providers.anthropic.api_key.as_deref(), Some("sk-test"));
        assert_eq!(
            config.providers.anthropic.base_url.as_deref(),
            Some("http://localhost:8080")
        );
    }

    #[test]
    fn test_load_from_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "model = [not toml").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_init_creates_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        Config::init(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("model ="));
        assert!(contents.contains("[providers.anthropic]"));

        // The template must round-trip through the loader.
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.model, DEFAULT_CHAT_MODEL);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "# existing config").unwrap();

        let err = Config::init(&path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
