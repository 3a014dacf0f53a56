//! User settings loaded from `settings.toml`.
//!
//! The file lives in the platform-specific configuration folder:
//! - macOS: ~/Library/Application Support/dev.tabmap.tabmap/
//! - Windows: %APPDATA%/tabmap/tabmap/config/
//! - Linux: ~/.config/tabmap/
//!
//! Command-line flags take precedence over every value here.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use tabmap_core::DEFAULT_EXPORT_LATENCY;
use tabmap_output::OutputFormat;

const APP_QUALIFIER: &str = "dev";
const APP_ORG: &str = "tabmap";
const APP_NAME: &str = "tabmap";
const CONFIG_FILENAME: &str = "settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub export: ExportSettings,
    pub cache: CacheSettings,
}

/// Export defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub format: OutputFormat,
    /// Directory for written files; the working directory when unset.
    pub output_dir: Option<PathBuf>,
    /// Minimum duration of an export, in milliseconds.
    pub min_latency_ms: u64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            output_dir: None,
            min_latency_ms: u64::try_from(DEFAULT_EXPORT_LATENCY.as_millis()).unwrap_or(300),
        }
    }
}

impl ExportSettings {
    pub fn min_latency(&self) -> Duration {
        Duration::from_millis(self.min_latency_ms)
    }
}

/// Mapping configuration cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Remember mappings between runs.
    pub enabled: bool,
    /// Cache directory; the platform data folder when unset.
    pub dir: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

/// Get the path to the settings file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn settings_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Default cache directory under the platform data folder.
pub fn default_cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("cache"))
}

/// Load settings from `path`, or from the platform location when `None`.
pub fn load_settings(path: Option<&Path>) -> Settings {
    match path {
        Some(path) => load_settings_from(path),
        None => {
            let Some(path) = settings_path() else {
                tracing::warn!("could not determine settings path, using defaults");
                return Settings::default();
            };
            load_settings_from(&path)
        }
    }
}

/// Load settings from a file.
///
/// Returns default settings if the file doesn't exist or cannot be parsed.
pub fn load_settings_from(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "failed to parse settings file, using defaults");
                Settings::default()
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file found, using defaults");
            Settings::default()
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "failed to read settings file, using defaults");
            Settings::default()
        }
    }
}
