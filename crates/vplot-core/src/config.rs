//! User preferences for new figures, stored as RON.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "VPLOT_CONFIG";
/// Environment variable forcing the headless interactor when set to `1`
pub const HEADLESS_ENV: &str = "VPLOT_HEADLESS";

/// Window defaults for new figures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    /// Title of figures created without an explicit name
    pub name: String,
    /// Background color, any name or hex string the color table accepts
    pub background: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            name: "vplot figure".to_string(),
            background: "light grey".to_string(),
        }
    }
}

/// Figure registry and interactor behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FigureConfig {
    /// Let `gcf()` create a figure when none is current
    pub auto_figure: bool,
    /// Never open native windows
    pub headless: bool,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            auto_figure: true,
            headless: false,
        }
    }
}

/// Tessellation and text defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualityConfig {
    pub sphere_theta_resolution: u32,
    pub sphere_phi_resolution: u32,
    pub arrow_resolution: u32,
    pub font_size: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            sphere_theta_resolution: 16,
            sphere_phi_resolution: 16,
            arrow_resolution: 12,
            font_size: 18,
        }
    }
}

/// Complete vplot configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlotConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub figure: FigureConfig,
    #[serde(default)]
    pub quality: QualityConfig,
}

static GLOBAL: OnceLock<PlotConfig> = OnceLock::new();

impl PlotConfig {
    /// The process-wide configuration, read once on first access.
    pub fn global() -> &'static PlotConfig {
        GLOBAL.get_or_init(|| {
            let mut config = ConfigManager::new().config().clone();
            if headless_forced() {
                config.figure.headless = true;
            }
            config
        })
    }

    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Whether `VPLOT_HEADLESS=1` is set
pub fn headless_forced() -> bool {
    std::env::var(HEADLESS_ENV).is_ok_and(|v| v.trim() == "1")
}

/// Configuration error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// Loads, saves and resets the configuration file
pub struct ConfigManager {
    config: PlotConfig,
    config_path: PathBuf,
    dirty: bool,
}

impl ConfigManager {
    /// Create a manager for the resolved config path, loading it if present
    pub fn new() -> Self {
        Self::with_path(Self::config_path())
    }

    /// Create a manager for an explicit path
    pub fn with_path(config_path: PathBuf) -> Self {
        let config = Self::load_from_path(&config_path).unwrap_or_else(|| {
            tracing::debug!("No config file at {:?}, using defaults", config_path);
            PlotConfig::default()
        });

        Self {
            config,
            config_path,
            dirty: false,
        }
    }

    /// Get the OS-standard configuration directory
    fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vplot")
    }

    /// `VPLOT_CONFIG` if set, else `<config_dir>/vplot/config.ron`
    fn config_path() -> PathBuf {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => Self::config_dir().join("config.ron"),
        }
    }

    fn load_from_path(path: &Path) -> Option<PlotConfig> {
        let content = std::fs::read_to_string(path).ok()?;
        match PlotConfig::from_ron(&content) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                None
            }
        }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Get a mutable reference to the configuration (marks as dirty)
    pub fn config_mut(&mut self) -> &mut PlotConfig {
        self.dirty = true;
        &mut self.config
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Save the configuration to disk if it has unsaved changes
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = self.config.to_ron()?;
        std::fs::write(&self.config_path, &content).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::info!("Saved config to {:?}", self.config_path);
        self.dirty = false;
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) {
        self.config = PlotConfig::default();
        self.dirty = true;
    }

    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlotConfig::default();
        assert_eq!((config.window.width, config.window.height), (600, 600));
        assert_eq!(config.window.background, "light grey");
        assert!(config.figure.auto_figure);
        assert!(!config.figure.headless);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = PlotConfig::from_ron("(figure: (auto_figure: false, headless: true))").unwrap();
        assert!(!config.figure.auto_figure);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.ron");

        let mut manager = ConfigManager::with_path(path.clone());
        assert!(!manager.is_dirty());
        manager.config_mut().window.width = 1024;
        assert!(manager.is_dirty());
        manager.save().unwrap();
        assert!(!manager.is_dirty());

        let reloaded = ConfigManager::with_path(path);
        assert_eq!(reloaded.config().window.width, 1024);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        std::fs::write(&path, "not ron at all (").unwrap();
        let manager = ConfigManager::with_path(path);
        assert_eq!(manager.config(), &PlotConfig::default());
    }

    #[test]
    fn test_reset_marks_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = ConfigManager::with_path(dir.path().join("c.ron"));
        manager.reset_to_defaults();
        assert!(manager.is_dirty());
    }
}
