use crate::style::DockVisualStyle;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the layout created when no saved layouts exist
pub const DEFAULT_LAYOUT_NAME: &str = "Default";

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub layouts: LayoutsConfig,

    #[serde(default)]
    pub floating: FloatingConfig,

    #[serde(default)]
    pub style: DockVisualStyle,
}

/// How tab groups are displayed by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabAlgorithm {
    /// Static tab size, a click switches tabs
    #[default]
    Proven,
    /// Tab size varies while hovering
    Smooth,
    /// Like smooth, with a preview of the content
    Active,
}

/// General dock frame settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Size of the split handle between two docked items in pixels
    #[serde(default = "default_handle_size")]
    pub handle_size: u32,

    /// Padding on each side of a split handle in pixels
    #[serde(default = "default_handle_padding")]
    pub handle_padding: u32,

    /// Width of an item that has no default width of its own
    #[serde(default = "default_item_width")]
    pub default_item_width: u32,

    /// Height of an item that has no default height of its own
    #[serde(default = "default_item_height")]
    pub default_item_height: u32,

    /// Delay before an auto-hidden item expands
    #[serde(default = "default_auto_show_delay")]
    pub auto_show_delay_ms: u32,

    /// Delay before an expanded auto-hidden item collapses again
    #[serde(default = "default_auto_hide_delay")]
    pub auto_hide_delay_ms: u32,

    #[serde(default)]
    pub tab_algorithm: TabAlgorithm,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            handle_size: default_handle_size(),
            handle_padding: default_handle_padding(),
            default_item_width: default_item_width(),
            default_item_height: default_item_height(),
            auto_show_delay_ms: default_auto_show_delay(),
            auto_hide_delay_ms: default_auto_hide_delay(),
            tab_algorithm: TabAlgorithm::default(),
        }
    }
}

impl GeneralConfig {
    /// Total space taken by a split handle including its padding
    pub fn total_handle_size(&self) -> u32 {
        self.handle_size + self.handle_padding * 2
    }
}

fn default_handle_size() -> u32 {
    4
}

fn default_handle_padding() -> u32 {
    2
}

fn default_item_width() -> u32 {
    300
}

fn default_item_height() -> u32 {
    250
}

fn default_auto_show_delay() -> u32 {
    400
}

fn default_auto_hide_delay() -> u32 {
    500
}

/// Saved layouts configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutsConfig {
    /// Layout that is bootstrapped and activated when nothing else is
    #[serde(default = "default_layout_name")]
    pub default_layout: String,

    /// Location of the layouts document, defaults to the config directory
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LayoutsConfig {
    fn default() -> Self {
        Self {
            default_layout: default_layout_name(),
            file: None,
        }
    }
}

fn default_layout_name() -> String {
    DEFAULT_LAYOUT_NAME.to_string()
}

/// Floating surface configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingConfig {
    #[serde(default = "default_floating_width")]
    pub default_width: u32,

    #[serde(default = "default_floating_height")]
    pub default_height: u32,
}

impl Default for FloatingConfig {
    fn default() -> Self {
        Self {
            default_width: default_floating_width(),
            default_height: default_floating_height(),
        }
    }
}

fn default_floating_width() -> u32 {
    640
}

fn default_floating_height() -> u32 {
    480
}

impl Config {
    /// Load configuration from the default location
    /// (~/.config/dockspace/config.toml)
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        Self::load_from_path(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        info!("Successfully loaded config from {:?}", path);
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        info!("Successfully saved config to {:?}", path);
        Ok(())
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("dockspace").join("config.toml"))
    }

    /// Path of the layouts document: the configured file, or
    /// `layouts.json` next to the config file
    pub fn layouts_path(&self) -> Result<PathBuf> {
        if let Some(file) = &self.layouts.file {
            return Ok(file.clone());
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("dockspace").join("layouts.json"))
    }

    /// Create a default config file if it doesn't exist
    pub fn create_default_if_missing() -> Result<()> {
        let path = Self::config_path()?;

        if path.exists() {
            debug!("Config file already exists at {:?}", path);
            return Ok(());
        }

        info!("Creating default config file at {:?}", path);
        Self::default().save_to_path(&path)
    }

    /// The fully populated default style with the configured overrides applied
    pub fn default_style(&self) -> DockVisualStyle {
        let mut style = DockVisualStyle::create_default_style();
        style.copy_values_from(&self.style);
        style
    }
}
