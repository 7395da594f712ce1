use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use updraft_core::{NumericComparator, SemverComparator, UpdateError, UpdateType, VersionComparator};
use updraft_platform::AppPaths;

use crate::error::SettingsError;
use crate::logging;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdaterSettings {
    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,

    #[serde(default)]
    pub preferred_update_type: UpdateType,

    #[serde(default)]
    pub comparator: ComparatorKind,
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for UpdaterSettings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
            preferred_update_type: UpdateType::default(),
            comparator: ComparatorKind::default(),
        }
    }
}

impl UpdaterSettings {
    /// Load settings from the platform config directory, falling back to
    /// defaults when the file is missing or unreadable.
    pub fn load() -> Self {
        let Ok(paths) = AppPaths::new() else {
            return Self::default();
        };
        Self::load_from(&paths.settings_file())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|error| {
                log::warn!("Ignoring corrupt settings file {}: {error}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// # Errors
    /// Returns an error when the config directory cannot be resolved or the
    /// file cannot be written.
    pub fn save(&self) -> Result<(), SettingsError> {
        let paths = AppPaths::new()?;
        paths
            .ensure_dirs()
            .map_err(|error| SettingsError::io("failed to create config directory", error))?;
        self.save_to(&paths.settings_file())
    }

    /// # Errors
    /// Returns an error when the settings cannot be encoded or written.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let content = serde_json::to_string_pretty(self).map_err(SettingsError::Encode)?;
        std::fs::write(path, content)
            .map_err(|error| SettingsError::io("failed to write settings", error))
    }

    /// Install the global logger under the platform data directory, honoring
    /// `debug_logging` and `max_log_size_bytes`. Returns the log file path.
    ///
    /// # Errors
    /// Returns an error when the data directory cannot be resolved or the log
    /// file cannot be prepared.
    pub fn init_logging(&self) -> Result<PathBuf, SettingsError> {
        self.init_logging_at(&AppPaths::new()?)
    }

    /// # Errors
    /// Returns an error when the log directory or file cannot be prepared.
    pub fn init_logging_at(&self, paths: &AppPaths) -> Result<PathBuf, SettingsError> {
        paths
            .ensure_dirs()
            .map_err(|error| SettingsError::io("failed to create data directory", error))?;
        let log_path = paths.log_file();
        logging::install(&log_path, self.debug_logging, self.max_log_size_bytes)?;
        Ok(log_path)
    }

    /// Flip debug logging at runtime. Persist with [`Self::save`].
    pub fn set_debug_logging(&mut self, enabled: bool) {
        self.debug_logging = enabled;
        logging::set_logging_enabled(enabled);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparatorKind {
    #[default]
    Numeric,
    Semver,
}

impl ComparatorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Semver => "semver",
        }
    }

    #[must_use]
    pub fn comparator(self) -> Arc<dyn VersionComparator> {
        match self {
            Self::Numeric => Arc::new(NumericComparator),
            Self::Semver => Arc::new(SemverComparator),
        }
    }
}

impl FromStr for ComparatorKind {
    type Err = UpdateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numeric" => Ok(Self::Numeric),
            "semver" => Ok(Self::Semver),
            _ => Err(UpdateError::invalid_option(
                "comparator",
                format!("expected numeric or semver, got: {s}"),
            )),
        }
    }
}
