use anyhow::{bail, Context, Result};
use dockspace_layout::{DockFrame, DockItemBehavior, DockItemStatus};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Items to register before building a default layout
#[derive(Debug, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub area: Option<AreaEntry>,
    #[serde(default, rename = "item")]
    pub items: Vec<ItemEntry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AreaEntry {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
pub struct ItemEntry {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub status: DockItemStatus,
    #[serde(default)]
    pub behavior: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

fn default_visible() -> bool {
    true
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {:?}", path))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse manifest: {:?}", path))
    }

    /// Register every item of the manifest with `frame`
    pub fn register(&self, frame: &mut DockFrame) -> Result<()> {
        for entry in &self.items {
            let behavior = match entry.behavior.as_deref() {
                Some(names) => match DockItemBehavior::from_names(names) {
                    Some(behavior) => behavior,
                    None => bail!("Unknown behavior '{}' for item '{}'", names, entry.id),
                },
                None => DockItemBehavior::NORMAL,
            };

            let item = frame
                .add_item(&entry.id)
                .with_context(|| format!("Cannot register item '{}'", entry.id))?;
            item.default_location = entry.location.clone();
            item.default_visible = entry.visible;
            item.default_status = entry.status;
            item.default_width = entry.width;
            item.default_height = entry.height;

            frame.set_behavior(&entry.id, behavior)?;
            if let Some(title) = &entry.title {
                frame.set_title(&entry.id, title.as_str())?;
            }
        }
        Ok(())
    }
}
