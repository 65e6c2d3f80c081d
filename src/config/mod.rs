//! Configuration management.
//!
//! Loads, validates, and persists `config.yaml`, and fans typed change
//! events out to registered listeners (a plain callback list, replacing
//! the Qt-signal fan-out the original config manager used for the same
//! purpose).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod types;

pub use types::{
    ClipboardConfig, DefaultInputMode, FrequencyConfig, InputConfig, LayoutConfig, LayoutType,
    LoggingConfig, ThemeConfig, ThemeMode,
};

/// Top-level configuration, one owned value constructed once in `main` and
/// threaded through the components that need it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub frequency: FrequencyConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One config group changed; carries enough detail for a listener to
/// decide whether it cares without re-reading the whole config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigGroup {
    Layout,
    Theme,
    Input,
    Frequency,
    Clipboard,
    Logging,
}

pub type ChangeListener = Box<dyn Fn(ConfigGroup) + Send + Sync>;
pub type KeyChangeListener = Box<dyn Fn(&str) + Send + Sync>;

/// An explicit observer list, registered once at startup, replacing the
/// signal/slot fan-out of the original config manager. Every typed setter
/// on [`Config`] fires both the dot-path key listeners and the group
/// listeners through this.
#[derive(Default)]
pub struct ChangeListeners {
    group_listeners: Vec<ChangeListener>,
    key_listeners: Vec<KeyChangeListener>,
}

impl ChangeListeners {
    pub fn register(&mut self, listener: ChangeListener) {
        self.group_listeners.push(listener);
    }

    pub fn register_key(&mut self, listener: KeyChangeListener) {
        self.key_listeners.push(listener);
    }

    pub fn notify(&self, group: ConfigGroup) {
        for listener in &self.group_listeners {
            listener(group);
        }
    }

    /// Fires the generic `changed(key)` event followed by the typed group
    /// event, matching the order a listener subscribed to both would expect.
    pub fn notify_key(&self, key: &str, group: ConfigGroup) {
        for listener in &self.key_listeners {
            listener(key);
        }
        self.notify(group);
    }
}

impl Config {
    /// Loads `path`, parsing as YAML and validating. On any failure the
    /// caller should fall back to [`Config::default`] and log a warning
    /// (the server never refuses to start over a bad config file).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).context("failed to parse config.yaml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write config file: {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.layout.page_size == 0 {
            anyhow::bail!("layout.page_size must be greater than zero");
        }
        if self.clipboard.enabled && self.clipboard.max_count == 0 {
            anyhow::bail!("clipboard.max_count must be greater than zero when clipboard history is enabled");
        }
        Ok(())
    }

    /// Resolves a relative `logging.log_dir` against `data_dir`; an already
    /// absolute path, or no path at all, passes through unchanged.
    pub fn with_data_dir(mut self, data_dir: &Path) -> Self {
        if let Some(log_dir) = &self.logging.log_dir {
            if log_dir.is_relative() {
                self.logging.log_dir = Some(data_dir.join(log_dir));
            }
        }
        self
    }

    /// Generic dot-path getter mirroring the original config manager's
    /// `getString`/`getInt`/`getBool`, useful for settings UI code that
    /// wants to bind to a path without matching on every field.
    pub fn get_string(&self, path: &str) -> Option<String> {
        match path {
            "theme.custom_theme_name" => self.theme.custom_theme_name.clone(),
            "clipboard.hotkey" => Some(self.clipboard.hotkey.clone()),
            "logging.level" => Some(self.logging.level.clone()),
            _ => None,
        }
    }

    pub fn get_int(&self, path: &str) -> Option<i64> {
        match path {
            "layout.page_size" => Some(self.layout.page_size as i64),
            "frequency.min_count" => Some(self.frequency.min_count as i64),
            "clipboard.max_age_days" => Some(self.clipboard.max_age_days as i64),
            "clipboard.max_count" => Some(self.clipboard.max_count as i64),
            _ => None,
        }
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        match path {
            "frequency.enabled" => Some(self.frequency.enabled),
            "clipboard.enabled" => Some(self.clipboard.enabled),
            _ => None,
        }
    }

    /// Clamped to `1..=10`, matching the candidate window's maximum page
    /// capacity. Fires `changed("layout.page_size")` then
    /// [`ConfigGroup::Layout`].
    pub fn set_page_size(&mut self, value: u32, listeners: &ChangeListeners) {
        self.layout.page_size = value.clamp(1, 10);
        listeners.notify_key("layout.page_size", ConfigGroup::Layout);
    }

    pub fn set_layout_type(&mut self, value: LayoutType, listeners: &ChangeListeners) {
        self.layout.r#type = value;
        listeners.notify_key("layout.type", ConfigGroup::Layout);
    }

    pub fn set_theme_mode(&mut self, value: ThemeMode, listeners: &ChangeListeners) {
        self.theme.mode = value;
        listeners.notify_key("theme.mode", ConfigGroup::Theme);
    }

    /// Clamped to `1..=365`, the persisted setting's valid range. The
    /// store-level "0 disables the age bound" behavior is a retention-API
    /// feature, not a value a config setter can put in the saved config.
    pub fn set_clipboard_max_age_days(&mut self, value: u32, listeners: &ChangeListeners) {
        self.clipboard.max_age_days = value.clamp(1, 365);
        listeners.notify_key("clipboard.max_age_days", ConfigGroup::Clipboard);
    }

    /// Clamped to `100..=10000`, the persisted setting's valid range.
    pub fn set_clipboard_max_count(&mut self, value: u32, listeners: &ChangeListeners) {
        self.clipboard.max_count = value.clamp(100, 10_000);
        listeners.notify_key("clipboard.max_count", ConfigGroup::Clipboard);
    }

    pub fn set_clipboard_enabled(&mut self, value: bool, listeners: &ChangeListeners) {
        self.clipboard.enabled = value;
        listeners.notify_key("clipboard.enabled", ConfigGroup::Clipboard);
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            layout: LayoutConfig::default(),
            theme: ThemeConfig::default(),
            input: InputConfig::default(),
            frequency: FrequencyConfig::default(),
            clipboard: ClipboardConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Resolves the per-user data directory (`config.yaml`, `clipboard.db`,
/// `clipboard/images/`, `clipboard/thumbnails/`, `themes/`), creating it if
/// absent.
pub fn data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("could not resolve a platform data directory")?;
    let dir = base.join("SuYan");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create data directory: {}", dir.display()))?;
    Ok(dir)
}
