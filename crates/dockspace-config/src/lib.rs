pub mod config;
pub mod style;

pub use config::{
    Config, FloatingConfig, GeneralConfig, LayoutsConfig, TabAlgorithm, DEFAULT_LAYOUT_NAME,
};
pub use style::{Color, ColorParseError, DockVisualStyle, TabStyle};
