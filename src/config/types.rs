//! Configuration type definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultInputMode {
    Chinese,
    English,
}

/// Candidate window layout preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub r#type: LayoutType,
    pub page_size: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            r#type: LayoutType::Horizontal,
            page_size: 9,
        }
    }
}

/// Theme selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub mode: ThemeMode,
    pub custom_theme_name: Option<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Auto,
            custom_theme_name: None,
        }
    }
}

/// Input mode defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub default_mode: DefaultInputMode,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            default_mode: DefaultInputMode::Chinese,
        }
    }
}

/// Frequency-learning pass-through toggles; the learning itself is owned by
/// the engine, never reimplemented here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyConfig {
    pub enabled: bool,
    pub min_count: u32,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_count: 3,
        }
    }
}

/// Clipboard history retention and monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipboardConfig {
    pub enabled: bool,
    pub max_age_days: u32,
    pub max_count: u32,
    pub hotkey: String,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age_days: 30,
            max_count: 1000,
            hotkey: "Ctrl+Shift+V".to_string(),
        }
    }
}

/// Logging configuration: ambient, carried from the teacher's logging
/// config shape even though the distilled spec doesn't name it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: Option<std::path::PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}
