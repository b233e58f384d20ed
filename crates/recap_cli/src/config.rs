//! Configuration file support for recap.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `RECAP_`, e.g., `RECAP_GITHUB_TOKEN`)
//! 3. Config file (~/.config/recap/config.toml or ./recap.toml)
//! 4. Built-in defaults
//!
//! The cache file defaults to `~/.local/state/recap/cache.json` on Linux
//! (using the XDG state directory) if not explicitly configured.
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "ghp_..."  # or use RECAP_GITHUB_TOKEN env var
//! api_url = "https://github.example.com/api/v3"  # optional, for Enterprise
//!
//! [cache]
//! path = "/tmp/recap-cache.json"  # optional
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub configuration.
    pub github: GitHubConfig,
    /// Cache configuration.
    pub cache: CacheConfig,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub API token.
    /// Can also be set via RECAP_GITHUB_TOKEN environment variable.
    pub token: Option<String>,
    /// API base URL override, for GitHub Enterprise instances.
    pub api_url: Option<String>,
}

/// Cache configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Path of the JSON cache file.
    /// Defaults to the XDG state directory if not specified.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/recap/config.toml)
    /// 3. Local config file (./recap.toml)
    /// 4. Environment variables with RECAP_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "recap") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let local_config = PathBuf::from("recap.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./recap.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., RECAP_GITHUB_TOKEN -> github.token
        builder = builder.add_source(
            Environment::with_prefix("RECAP")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the GitHub token.
    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone()
    }

    /// Get the API base URL override, if any.
    pub fn api_url(&self) -> Option<String> {
        self.github.api_url.clone()
    }

    /// Get the cache file path, falling back to the default state directory.
    pub fn cache_path(&self) -> PathBuf {
        self.cache
            .path
            .clone()
            .or_else(|| Self::default_state_dir().map(|dir| dir.join("cache.json")))
            .unwrap_or_else(|| PathBuf::from("recap-cache.json"))
    }

    /// Get the default state directory path.
    ///
    /// On Linux, this is `$XDG_STATE_HOME/recap` or `~/.local/state/recap`.
    /// On macOS/Windows, falls back to the data directory.
    fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "recap").map(|dirs| {
            // state_dir() returns None on macOS/Windows, fall back to data_dir
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.github.token.is_none());
        assert!(config.github.api_url.is_none());
        assert!(config.cache.path.is_none());
    }

    #[test]
    fn test_config_builder_with_toml_string() {
        let toml_content = r#"
            [github]
            token = "ghp_test123"
            api_url = "https://github.example.com/api/v3"

            [cache]
            path = "/tmp/recap-cache.json"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();

        assert_eq!(config.github_token(), Some("ghp_test123".to_string()));
        assert_eq!(
            config.api_url(),
            Some("https://github.example.com/api/v3".to_string())
        );
        assert_eq!(config.cache_path(), PathBuf::from("/tmp/recap-cache.json"));
    }

    #[test]
    fn test_config_builder_partial_override() {
        let base_toml = r#"
            [github]
            token = "base-token"
            api_url = "https://github.example.com/api/v3"
        "#;

        let override_toml = r#"
            [github]
            token = "override-token"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(base_toml, FileFormat::Toml))
            .add_source(config::File::from_str(override_toml, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();

        assert_eq!(config.github_token(), Some("override-token".to_string()));
        // api_url should remain from base (not overridden)
        assert_eq!(
            config.api_url(),
            Some("https://github.example.com/api/v3".to_string())
        );
    }

    #[test]
    fn test_cache_path_defaults_to_state_dir() {
        let config = Config::default();
        let path = config.cache_path();
        assert!(path.to_string_lossy().contains("recap"));
        assert!(path.to_string_lossy().ends_with("cache.json"));
    }

    #[test]
    fn test_config_unknown_fields_ignored() {
        let toml_content = r#"
            [github]
            token = "ghp_test123"
            unknown_field = "should be ignored"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();
        assert_eq!(config.github_token(), Some("ghp_test123".to_string()));
    }

    #[test]
    fn test_config_invalid_toml() {
        let invalid_toml = r#"
            [github
            token = "ghp_test123"
        "#;

        let result = ConfigBuilder::builder()
            .add_source(config::File::from_str(invalid_toml, FileFormat::Toml))
            .build();

        assert!(result.is_err());
    }
}
