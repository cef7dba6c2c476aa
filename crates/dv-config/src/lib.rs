//! Configuration management for dv.
//!
//! Parses `dv.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dv.toml";

/// Largest document the pipeline will accept, in bytes.
const DEFAULT_MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the experimental-converters flag.
    pub experimental: Option<bool>,
    /// Override GitHub Flavored Markdown rendering.
    pub gfm: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering configuration.
    pub render: RenderConfig,
    /// Input limits.
    pub limits: LimitsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Run the experimental diagram/table converters.
    pub experimental: bool,
    /// Enable GitHub Flavored Markdown extensions in the HTML renderer.
    pub gfm: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            experimental: false,
            gfm: true,
        }
    }
}

/// Input limits.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest document accepted, in bytes.
    pub max_file_size: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dv.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, so CLI arguments take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(experimental) = settings.experimental {
            self.render.experimental = experimental;
        }
        if let Some(gfm) = settings.gfm {
            self.render.gfm = gfm;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_file_size == 0 {
            return Err(ConfigError::Validation(
                "limits.max_file_size cannot be 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.render.experimental);
        assert!(config.render.gfm);
        assert_eq!(config.limits.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            "[render]\nexperimental = true\ngfm = false\n\n[limits]\nmax_file_size = 1024\n",
        )
        .unwrap();
        assert!(config.render.experimental);
        assert!(!config.render.gfm);
        assert_eq!(config.limits.max_file_size, 1024);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str("[render]\nexperimental = true\n").unwrap();
        assert!(config.render.experimental);
        assert!(config.render.gfm);
        assert_eq!(config.limits.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_cli_settings_override() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            experimental: Some(true),
            gfm: None,
        });
        assert!(config.render.experimental);
        assert!(config.render.gfm);
    }

    #[test]
    fn test_validate_rejects_zero_size_limit() {
        let config: Config = toml::from_str("[limits]\nmax_file_size = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_missing_explicit_path_errors() {
        let missing = Path::new("/nonexistent/dv.toml");
        assert!(matches!(
            Config::load(Some(missing), None),
            Err(ConfigError::NotFound(_))
        ));
    }
}
