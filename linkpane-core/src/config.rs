//! src/config.rs
//! ============================================================================
//! # Config: user settings loaded from TOML
//!
//! Lives at the platform config dir resolved by the
//! [`directories`](https://docs.rs/directories) crate
//! (`$XDG_CONFIG_HOME/linkpane/config.toml` on Linux). Missing fields fall
//! back to their defaults so older files keep loading.

use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::fs::paths::CaseSensitivity;
use crate::logging::LoggerConfig;

/// Main configuration struct for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Location panes reset to. `None` means the current user's home.
    pub default_root: Option<PathBuf>,

    /// Ask the presentation layer before every link creation.
    pub confirm_before_link: bool,

    pub case_sensitivity: CaseSensitivity,

    pub logging: LoggerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_root: None,
            confirm_before_link: true,
            case_sensitivity: CaseSensitivity::Auto,
            logging: LoggerConfig::default(),
        }
    }
}

impl Config {
    /// Loads config from the platform config dir, writing defaults if absent.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            info!("Loading config from {}", path.display());
            Self::load_from_file(&path)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to_file(&path)?;

            Ok(default_config)
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AppError::config_io(path, e))?;

        Ok(toml::from_str(&text)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let path = path.as_ref();

        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::config_io(parent, e))?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str).map_err(|e| AppError::config_io(path, e))?;

        Ok(())
    }

    /// Returns the canonical config file path.
    pub fn config_path() -> AppResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> AppResult<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("org", "linkpane", "LinkPane").ok_or(AppError::ConfigDirUnavailable)?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Where panes go on reset, resolved now rather than at startup so a
    /// changed user is reflected.
    #[must_use]
    pub fn reset_location(&self) -> Option<PathBuf> {
        self.default_root.clone().or_else(home_dir)
    }
}

/// Current user's home directory, if the platform reports one.
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_then_load_preserves_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            default_root: Some(PathBuf::from("/srv/data")),
            confirm_before_link: false,
            case_sensitivity: CaseSensitivity::Insensitive,
            ..Config::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.default_root, Some(PathBuf::from("/srv/data")));
        assert!(!loaded.confirm_before_link);
        assert_eq!(loaded.case_sensitivity, CaseSensitivity::Insensitive);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "confirm_before_link = false\n").unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert!(!loaded.confirm_before_link);
        assert_eq!(loaded.case_sensitivity, CaseSensitivity::Auto);
        assert!(loaded.default_root.is_none());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "confirm_before_link = \"maybe\"\n").unwrap();

        assert!(matches!(
            Config::load_from_file(&path),
            Err(AppError::ConfigParse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load_from_file(dir.path().join("absent.toml")),
            Err(AppError::ConfigIo { .. })
        ));
    }

    #[test]
    fn default_root_overrides_home() {
        let config = Config {
            default_root: Some(PathBuf::from("/opt")),
            ..Config::default()
        };
        assert_eq!(config.reset_location(), Some(PathBuf::from("/opt")));
    }

    #[test]
    fn without_default_root_resets_to_home() {
        assert_eq!(Config::default().reset_location(), home_dir());
    }
}
