//! Configuration support for the viewer.
//!
//! Preferences and keybindings are exchanged as JSON. Reading and writing the
//! file itself is left to the host.

use serde::{Deserialize, Serialize};

use crate::constants::{CONFIG_VERSION, HANDLE_SIZE, ZOOM_STEP};
use crate::error::ConfigError;
use crate::keybindings::KeyBindings;

/// Log level setting for the viewer.
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

/// Install `env_logger` with the given level.
///
/// `RUST_LOG` still overrides per-module levels. Calling this more than once
/// only adjusts the global max level.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(level: LogLevel) {
    let result = env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
    if result.is_err() {
        log::set_max_level(level.to_level_filter());
        log::debug!("Logger already initialized, level set to {}", level.name());
    }
}

/// Logging is left to the host on wasm; only the max level is applied.
#[cfg(target_arch = "wasm32")]
pub fn init_logging(level: LogLevel) {
    log::set_max_level(level.to_level_filter());
}

/// Viewer configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// User preferences
    #[serde(default)]
    pub preferences: ViewerPreferences,

    /// Keybinding configuration
    #[serde(default)]
    pub keybindings: KeyBindings,
}

/// Preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerPreferences {
    /// Multiplicative factor for one zoom click
    pub zoom_step: f32,

    /// Resize handle size in device pixels
    pub handle_size: f32,

    /// Keep shapes drawn without moving the pointer
    pub keep_empty_rois: bool,

    /// Whether the host should show the tool bar
    pub show_toolbar: bool,

    /// Log verbosity level
    pub log_level: LogLevel,
}

impl Default for ViewerPreferences {
    fn default() -> Self {
        Self {
            zoom_step: ZOOM_STEP,
            handle_size: HANDLE_SIZE,
            keep_empty_rois: true,
            show_toolbar: true,
            log_level: LogLevel::default(),
        }
    }
}

impl ViewerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: ViewerPreferences::default(),
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

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefs = &self.preferences;
        if !prefs.zoom_step.is_finite() || prefs.zoom_step <= 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "preferences.zoom_step".to_string(),
                message: format!("must be greater than 1.0, got {}", prefs.zoom_step),
            });
        }
        if !prefs.handle_size.is_finite() || prefs.handle_size <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "preferences.handle_size".to_string(),
                message: format!("must be positive, got {}", prefs.handle_size),
            });
        }
        Ok(())
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new()
    }
}
