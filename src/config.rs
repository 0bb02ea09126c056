use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prompt::Mode;

pub const APP_NAME: &str = "PolliPaper";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid resolution {0:?}; expected WIDTHxHEIGHT")]
    InvalidResolution(String),
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Output size, persisted as a `"WIDTHxHEIGHT"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl FromStr for Resolution {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SettingsError::InvalidResolution(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl TryFrom<String> for Resolution {
    type Error = SettingsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Resolutions offered for quick selection.
pub const SUPPORTED_RESOLUTIONS: &[&str] = &[
    "1920x1080",
    "2560x1440",
    "3840x2160",
    "1366x768",
    "1280x720",
];

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub resolution: Resolution,
    /// Seconds between auto-change generations.
    #[serde(default = "default_interval")]
    pub auto_change_interval: u64,
    #[serde(default = "default_true")]
    pub enhance_prompts: bool,
    #[serde(default)]
    pub custom_prompt: String,
    #[serde(default)]
    pub auto_start: bool,
    #[serde(default = "default_true")]
    pub minimize_to_tray: bool,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_interval() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    crate::pollinations::types::DEFAULT_MODEL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            resolution: Resolution::default(),
            auto_change_interval: default_interval(),
            enhance_prompts: default_true(),
            custom_prompt: String::new(),
            auto_start: false,
            minimize_to_tray: default_true(),
            api_key: String::new(),
            model: default_model(),
        }
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Per-user application directory, e.g. `%APPDATA%\PolliPaper`.
pub fn app_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

pub fn cache_dir() -> PathBuf {
    app_dir().join("cache")
}

pub fn settings_path() -> PathBuf {
    app_dir().join("settings.json")
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// JSON-file backed settings persistence.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(settings_path())
    }
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// malformed. Missing keys take their individual defaults.
    pub fn load(&self) -> Settings {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return Settings::default();
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "malformed settings, using defaults: {e}");
            Settings::default()
        })
    }

    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        tracing::info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
