use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Where an item lives while it is visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockItemStatus {
    /// Embedded in the layout tree
    #[default]
    Dockable,
    /// Collapsed into an edge strip, expands on demand
    AutoHide,
    /// Detached into its own top-level surface
    Floating,
}

bitflags! {
    /// What the user may do with an item
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct DockItemBehavior: u32 {
        const NORMAL = 0;
        const CANT_CLOSE = 1 << 0;
        const CANT_AUTO_HIDE = 1 << 1;
        const NEVER_FLOATING = 1 << 2;
        /// Drop the item entirely once it is hidden in every layout
        const CLOSE_ON_HIDE = 1 << 3;
        /// Placement cannot be changed with `set_dock_location`
        const LOCKED = 1 << 4;
    }
}

impl DockItemBehavior {
    /// Parse a behavior list such as `"cant_close|close_on_hide"`
    pub fn from_names(names: &str) -> Option<Self> {
        let mut behavior = Self::NORMAL;
        for name in names.split(['|', ',']).map(str::trim).filter(|s| !s.is_empty()) {
            behavior |= match name.to_ascii_lowercase().as_str() {
                "normal" => Self::NORMAL,
                "cant_close" => Self::CANT_CLOSE,
                "cant_auto_hide" => Self::CANT_AUTO_HIDE,
                "never_floating" => Self::NEVER_FLOATING,
                "close_on_hide" => Self::CLOSE_ON_HIDE,
                "locked" => Self::LOCKED,
                _ => return None,
            };
        }
        Some(behavior)
    }
}

/// Default metadata supplied by the content factory for a new item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTemplate {
    pub title: String,
    pub icon: Option<String>,
    pub location: Option<String>,
    pub visible: bool,
    pub status: DockItemStatus,
    pub behavior: DockItemBehavior,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Default for ItemTemplate {
    fn default() -> Self {
        Self {
            title: String::new(),
            icon: None,
            location: None,
            visible: true,
            status: DockItemStatus::Dockable,
            behavior: DockItemBehavior::NORMAL,
            width: None,
            height: None,
        }
    }
}

/// Produces metadata and content for dock items on behalf of the host
pub trait ContentFactory {
    /// Default metadata for a freshly registered item
    fn describe(&mut self, _id: &str) -> ItemTemplate {
        ItemTemplate::default()
    }

    /// Build the item's content; called once, the first time it is shown
    fn create_content(&mut self, id: &str);
}

/// An addressable unit of dockable content, independent of its placement
#[derive(Debug, Clone, PartialEq)]
pub struct DockItem {
    id: String,
    pub(crate) title: String,
    pub(crate) icon: Option<String>,
    pub(crate) behavior: DockItemBehavior,

    /// Placement spec used when the item is first shown in a layout
    pub default_location: Option<String>,
    pub default_visible: bool,
    pub default_status: DockItemStatus,
    pub default_width: Option<u32>,
    pub default_height: Option<u32>,

    pub(crate) content_loaded: bool,
    pub(crate) last_visible: bool,
    pub(crate) last_content_visible: bool,
}

impl DockItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            icon: None,
            behavior: DockItemBehavior::NORMAL,
            default_location: None,
            default_visible: true,
            default_status: DockItemStatus::Dockable,
            default_width: None,
            default_height: None,
            content_loaded: false,
            last_visible: false,
            last_content_visible: false,
        }
    }

    pub(crate) fn apply_template(&mut self, template: ItemTemplate) {
        self.title = template.title;
        self.icon = template.icon;
        self.default_location = template.location.filter(|spec| !spec.trim().is_empty());
        self.default_visible = template.visible;
        self.default_status = template.status;
        self.behavior = template.behavior;
        self.default_width = template.width;
        self.default_height = template.height;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn behavior(&self) -> DockItemBehavior {
        self.behavior
    }

    pub fn content_loaded(&self) -> bool {
        self.content_loaded
    }

    /// Numeric suffix of ids like `"Editor-3"`, 0 when there is none
    pub fn instance_index(&self) -> u32 {
        self.id
            .rsplit_once('-')
            .and_then(|(_, suffix)| suffix.parse().ok())
            .unwrap_or(0)
    }
}
