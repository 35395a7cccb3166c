//! User preferences.
//!
//! Preferences are read from an optional TOML file in the platform config
//! directory (for example `~/.config/simdupe/config.toml` on Linux) and
//! layered with figment: built-in defaults < file < command line.
//!
//! ```toml
//! mode = "simple"
//! by_name = false
//! by_size = true
//! by_hash = true
//! delete_mode = "trash"
//! theme = "dark"
//! ```
//!
//! The file is never written by the tool.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::actions::DeleteMode;
use crate::cli::Cli;
use crate::duplicates::ScanMode;

/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Preferred grouping family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeChoice {
    /// Name/size/hash criteria
    #[default]
    Simple,
    /// Version and sequence detection
    Smart,
}

/// Preferred TUI palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    /// Guess from the terminal
    #[default]
    Auto,
    /// Light text on dark background
    Dark,
    /// Dark text on light background
    Light,
}

/// Errors reading the preferences file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No home directory to derive the config location from.
    #[error("cannot determine the configuration directory")]
    NoConfigDir,

    /// The file exists but does not parse.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Application preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial scan mode family
    pub mode: ModeChoice,
    /// Simple mode: same name
    pub by_name: bool,
    /// Simple mode: same size
    pub by_size: bool,
    /// Simple mode: same content
    pub by_hash: bool,
    /// How the TUI deletes by default
    pub delete_mode: DeleteMode,
    /// TUI palette
    pub theme: ThemeChoice,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ModeChoice::Simple,
            by_name: false,
            by_size: true,
            by_hash: true,
            delete_mode: DeleteMode::Trash,
            theme: ThemeChoice::Auto,
        }
    }
}

impl Config {
    /// Default platform-specific location of the preferences file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] when no home directory is known.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("", "", "simdupe")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Read the preferences file layered over the defaults.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the file does not parse.
    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Load preferences, falling back to the defaults with a warning.
    ///
    /// `path` overrides the default location.
    #[must_use]
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Ok(p) => p,
                Err(e) => {
                    log::debug!("{}, using default preferences", e);
                    return Self::default();
                }
            },
        };

        match Self::try_load(&path) {
            Ok(config) => {
                log::debug!("Preferences loaded from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// The scan mode these preferences describe.
    #[must_use]
    pub fn scan_mode(&self) -> ScanMode {
        match self.mode {
            ModeChoice::Smart => ScanMode::Smart,
            ModeChoice::Simple => ScanMode::simple(self.by_name, self.by_size, self.by_hash),
        }
    }

    /// Initial scan mode: the command line wins over the file.
    #[must_use]
    pub fn resolve_scan_mode(&self, cli: &Cli) -> ScanMode {
        cli.scan_mode().unwrap_or_else(|| self.scan_mode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.scan_mode(), ScanMode::simple(false, true, true));
        assert_eq!(config.delete_mode, DeleteMode::Trash);
        assert_eq!(config.theme, ThemeChoice::Auto);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::try_load(&dir.path().join("none.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_layers_over_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "mode = \"smart\"\ntheme = \"light\"\n").unwrap();

        let config = Config::try_load(&path).unwrap();
        assert_eq!(config.mode, ModeChoice::Smart);
        assert_eq!(config.theme, ThemeChoice::Light);
        assert!(config.by_size);
        assert_eq!(config.scan_mode(), ScanMode::Smart);
    }

    #[test]
    fn test_delete_mode_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "delete_mode = \"permanent\"\nby_hash = false\n").unwrap();

        let config = Config::try_load(&path).unwrap();
        assert_eq!(config.delete_mode, DeleteMode::Permanent);
        assert_eq!(config.scan_mode(), ScanMode::simple(false, true, false));
    }

    #[test]
    fn test_invalid_file_errors_and_load_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "mode = [not toml").unwrap();

        assert!(Config::try_load(&path).is_err());
        assert_eq!(Config::load(Some(&path)), Config::default());
    }

    #[test]
    fn test_cli_overrides_file() {
        let config = Config {
            mode: ModeChoice::Smart,
            ..Config::default()
        };
        let cli = Cli::try_parse_from(["simdupe", "--by-name"]).unwrap();
        assert_eq!(
            config.resolve_scan_mode(&cli),
            ScanMode::simple(true, false, false)
        );

        let cli = Cli::try_parse_from(["simdupe"]).unwrap();
        assert_eq!(config.resolve_scan_mode(&cli), ScanMode::Smart);
    }
}
