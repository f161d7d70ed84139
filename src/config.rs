//! Configuration file support.
//!
//! This module provides serialization and deserialization of editor settings:
//! default annotation style, theme palette, tool hotkeys and log verbosity.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FILL, DEFAULT_FILL_OPACITY, DEFAULT_FONT_SIZE, DEFAULT_STROKE_WIDTH,
    DEFAULT_TEXT_PLACEHOLDER, UNDO_HISTORY_SIZE,
};
use crate::keybindings::KeyBindings;
use crate::model::{FontWeight, Palette, ToolStyle};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Editor configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Tool hotkeys
    #[serde(default)]
    pub keybindings: KeyBindings,
}

fn default_app_name() -> String {
    "mermaid-annotate".to_string()
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    /// Log verbosity level
    pub log_level: LogLevel,

    /// Stroke width for new arrows, lines and shapes
    pub stroke_width: f32,

    /// Font size for new text annotations
    pub font_size: f32,

    /// Font weight for new text annotations
    pub font_weight: FontWeight,

    /// Font family for new text annotations (`None` inherits the host font)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    /// Fill for new rectangles and circles
    pub fill: String,

    pub fill_opacity: f32,

    /// Initial content of a new text annotation
    pub text_placeholder: String,

    /// Theme colors annotations follow until recolored by hand
    pub palette: Palette,

    /// Number of undo steps to keep
    pub undo_history: usize,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            font_weight: FontWeight::Normal,
            font_family: None,
            fill: DEFAULT_FILL.to_string(),
            fill_opacity: DEFAULT_FILL_OPACITY,
            text_placeholder: DEFAULT_TEXT_PLACEHOLDER.to_string(),
            palette: Palette::default(),
            undo_history: UNDO_HISTORY_SIZE,
        }
    }
}

impl UserPreferences {
    /// Style the drawing tools start out with.
    pub fn to_tool_style(&self) -> ToolStyle {
        ToolStyle {
            palette: self.palette.clone(),
            stroke_width: self.stroke_width,
            font_size: self.font_size,
            font_weight: self.font_weight,
            font_family: self.font_family.clone(),
            fill: self.fill.clone(),
            fill_opacity: self.fill_opacity,
            text_placeholder: self.text_placeholder.clone(),
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            keybindings: KeyBindings::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "mermaid-annotate-config.json"
    }

    /// Load from the platform's default location, falling back to defaults.
    pub fn load_or_default() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let loaded = Self::load_from_default_path();
        #[cfg(target_arch = "wasm32")]
        let loaded = Self::load_from_local_storage();

        loaded.unwrap_or_default()
    }

    /// Get the default config file path for auto-load/save.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(
                config_dir
                    .join("mermaid-annotate")
                    .join(Self::default_filename()),
            )
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("mermaid-annotate")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from an explicit file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from_path(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(&path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// LocalStorage key for WASM config persistence.
    #[cfg(target_arch = "wasm32")]
    const LOCALSTORAGE_KEY: &'static str = "mermaid-annotate-config";

    /// Try to load configuration from localStorage (WASM only).
    /// Returns None if not found or can't be parsed.
    #[cfg(target_arch = "wasm32")]
    pub fn load_from_local_storage() -> Option<Self> {
        let window = web_sys::window()?;
        let storage = window.local_storage().ok()??;

        match storage.get_item(Self::LOCALSTORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from localStorage");
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config from localStorage: {}", e);
                    None
                }
            },
            Ok(None) => {
                log::debug!("No config found in localStorage");
                None
            }
            Err(e) => {
                log::warn!("Failed to read from localStorage: {:?}", e);
                None
            }
        }
    }

    /// Save configuration to localStorage (WASM only).
    #[cfg(target_arch = "wasm32")]
    pub fn save_to_local_storage(&self) -> Result<(), ConfigError> {
        let window = web_sys::window()
            .ok_or_else(|| ConfigError::StorageError("No window object available".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(|e| ConfigError::StorageError(format!("localStorage access error: {:?}", e)))?
            .ok_or_else(|| ConfigError::StorageError("localStorage not available".to_string()))?;

        let json = self.to_json()?;
        storage
            .set_item(Self::LOCALSTORAGE_KEY, &json)
            .map_err(|e| {
                ConfigError::StorageError(format!("Failed to save to localStorage: {:?}", e))
            })?;

        log::info!("Saved configuration to localStorage");
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Storage error (localStorage in WASM)
    #[error("Storage error: {0}")]
    StorageError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Key;
    use crate::model::AnnotationTool;

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r##"{
            "version": 1,
            "preferences": {"stroke_width": 4, "palette": {"primary": "#000000", "secondary": "#111111", "text": "#222222"}},
            "keybindings": {"tool_rect": {"char": "b"}}
        }"##;
        let config = AppConfig::from_json(json).expect("valid config");
        assert_eq!(config.app_name, "mermaid-annotate");
        assert_eq!(config.preferences.stroke_width, 4.0);
        assert_eq!(config.preferences.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(config.preferences.undo_history, UNDO_HISTORY_SIZE);
        assert_eq!(
            config.keybindings.tool_for_key(Key::Char('b')),
            Some(AnnotationTool::Rect)
        );
        assert_eq!(
            config.keybindings.tool_for_key(Key::Char('a')),
            Some(AnnotationTool::Arrow)
        );

        let style = config.preferences.to_tool_style();
        assert_eq!(style.palette.primary, "#000000");
        assert_eq!(style.stroke_width, 4.0);
    }

    #[test]
    fn test_round_trip() {
        let mut config = AppConfig::new();
        config.preferences.log_level = LogLevel::Debug;
        config.preferences.font_family = Some("monospace".to_string());
        let json = config.to_json().expect("serializable");
        assert_eq!(AppConfig::from_json(&json).expect("valid"), config);
    }

    #[test]
    fn test_rejects_newer_version() {
        let json = format!(r#"{{"version": {}}}"#, CONFIG_VERSION + 1);
        assert!(matches!(
            AppConfig::from_json(&json),
            Err(ConfigError::VersionTooNew { .. })
        ));
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::default().to_level_filter(), log::LevelFilter::Info);
        assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
    }
}
