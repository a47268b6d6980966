use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Color must start with '#': {0}")]
    MissingHash(String),
    #[error("Color must have 6 or 8 hex digits: {0}")]
    InvalidLength(String),
    #[error("Invalid hex digit in color: {0}")]
    InvalidDigit(String),
}

/// RGBA color, written as `#RRGGBB` or `#RRGGBBAA` in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;

        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorParseError::InvalidLength(s.to_string()));
        }

        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ColorParseError::InvalidDigit(s.to_string()))
        };

        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// How tabs in a tabbed group are sized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabStyle {
    Normal,
    Uniform,
}

/// Visual style of a dock item or region.
///
/// Every field is optional so that styles can be layered: the default style
/// is overlaid with an item style and then with each matching region style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DockVisualStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad_background_color: Option<Color>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inactive_pad_background_color: Option<Color>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad_title_label_color: Option<Color>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_style: Option<TabStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand_tabs: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_pad_title_icon: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uppercase_titles: Option<bool>,
}

impl DockVisualStyle {
    /// A fully populated style using the Nord palette
    pub fn create_default_style() -> Self {
        Self {
            pad_background_color: Some(Color::rgb(0x3b, 0x42, 0x52)), // nord1
            inactive_pad_background_color: Some(Color::rgb(0x2e, 0x34, 0x40)), // nord0
            pad_title_label_color: Some(Color::rgb(0xec, 0xef, 0xf4)), // nord6
            tab_style: Some(TabStyle::Normal),
            expand_tabs: Some(false),
            show_pad_title_icon: Some(true),
            uppercase_titles: Some(false),
        }
    }

    /// Overwrite every field that is set in `other`
    pub fn copy_values_from(&mut self, other: &DockVisualStyle) {
        if other.pad_background_color.is_some() {
            self.pad_background_color = other.pad_background_color;
        }
        if other.inactive_pad_background_color.is_some() {
            self.inactive_pad_background_color = other.inactive_pad_background_color;
        }
        if other.pad_title_label_color.is_some() {
            self.pad_title_label_color = other.pad_title_label_color;
        }
        if other.tab_style.is_some() {
            self.tab_style = other.tab_style;
        }
        if other.expand_tabs.is_some() {
            self.expand_tabs = other.expand_tabs;
        }
        if other.show_pad_title_icon.is_some() {
            self.show_pad_title_icon = other.show_pad_title_icon;
        }
        if other.uppercase_titles.is_some() {
            self.uppercase_titles = other.uppercase_titles;
        }
    }
}
