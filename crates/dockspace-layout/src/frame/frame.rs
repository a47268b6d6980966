use crate::error::DockError;
use crate::item::{
    content_host, ContentFactory, ContentHost, DockEvent, DockItem, DockItemBehavior, DockItemStatus,
    EventQueue, StatusManager,
};
use crate::layout;
use crate::region::{add_default_item, add_hidden_top_level, add_item_at_location, SizeHint};
use crate::tree::{DockGroupItem, LayoutTree, LayoutTreeExt, NodeId, Orientation, Rectangle, TreeError};
use dockspace_config::{Config, DockVisualStyle};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// Owns the registered items and the named layouts, and drives every
/// placement and state change on the active one.
///
/// The frame never calls back into the host while an operation runs.
/// Notifications are queued and handed out by [`DockFrame::poll_event`] or
/// [`DockFrame::dispatch_events`].
pub struct DockFrame {
    pub(crate) config: Config,

    /// Registered items in registration order
    pub(crate) items: IndexMap<String, DockItem>,

    /// Named layouts; the active tree is the entry named by `current`
    pub(crate) layouts: BTreeMap<String, LayoutTree>,
    pub(crate) current: Option<String>,

    pub(crate) status: StatusManager,
    pub(crate) events: EventQueue,
    pub(crate) factory: Option<Box<dyn ContentFactory>>,

    /// Host area of the last relayout
    pub(crate) area: Rectangle,

    /// Region styles in registration order
    pub(crate) region_styles: Vec<(String, DockVisualStyle)>,
    pub(crate) item_styles: HashMap<String, DockVisualStyle>,
}

impl DockFrame {
    pub fn new(config: Config) -> Self {
        let status = StatusManager::new(config.floating.default_width, config.floating.default_height);
        Self {
            config,
            items: IndexMap::new(),
            layouts: BTreeMap::new(),
            current: None,
            status,
            events: EventQueue::new(),
            factory: None,
            area: Rectangle::default(),
            region_styles: Vec::new(),
            item_styles: HashMap::new(),
        }
    }

    pub fn with_content_factory(mut self, factory: impl ContentFactory + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    pub fn set_content_factory(&mut self, factory: Box<dyn ContentFactory>) {
        self.factory = Some(factory);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn area(&self) -> Rectangle {
        self.area
    }

    // Item registry

    /// Register a new item, filling its metadata from the content factory
    pub fn add_item(&mut self, id: &str) -> Result<&mut DockItem, DockError> {
        if self.items.contains_key(id) {
            return Err(DockError::DuplicateItem(id.to_string()));
        }

        let mut item = DockItem::new(id);
        if let Some(factory) = self.factory.as_mut() {
            item.apply_template(factory.describe(id));
        }

        debug!("Registered item '{}'", id);
        self.events.push(DockEvent::ItemAdded { id: id.to_string() });
        Ok(self.items.entry(id.to_string()).or_insert(item))
    }

    pub fn item(&self, id: &str) -> Option<&DockItem> {
        self.items.get(id)
    }

    pub fn item_mut(&mut self, id: &str) -> Option<&mut DockItem> {
        self.items.get_mut(id)
    }

    /// Items in registration order
    pub fn items(&self) -> impl Iterator<Item = &DockItem> {
        self.items.values()
    }

    pub fn get_items_containing_substring(&self, needle: &str) -> Vec<&DockItem> {
        self.items.values().filter(|item| item.id().contains(needle)).collect()
    }

    fn item_ref(&self, id: &str) -> Result<&DockItem, DockError> {
        self.items.get(id).ok_or_else(|| DockError::UnknownItem(id.to_string()))
    }

    // Active tree

    pub fn active_tree(&self) -> Option<&LayoutTree> {
        self.current.as_deref().and_then(|name| self.layouts.get(name))
    }

    pub(crate) fn active_tree_mut(&mut self) -> Result<&mut LayoutTree, DockError> {
        let name = self.current.as_deref().ok_or(DockError::NoActiveLayout)?;
        self.layouts
            .get_mut(name)
            .ok_or_else(|| DockError::UnknownLayout(name.to_string()))
    }

    fn active_leaf(&self, id: &str) -> Option<&DockGroupItem> {
        let tree = self.active_tree()?;
        tree.leaf(tree.find_dock_group_item(id)?)
    }

    // Item state

    /// Visibility of the item in the active layout
    pub fn visible(&self, id: &str) -> bool {
        self.active_leaf(id).is_some_and(|leaf| leaf.visible)
    }

    pub fn visible_in_layout(&self, id: &str, layout: &str) -> bool {
        self.layouts
            .get(layout)
            .and_then(|tree| tree.leaf(tree.find_dock_group_item(id)?))
            .is_some_and(|leaf| leaf.visible)
    }

    /// Status in the active layout, or the item's default status when it
    /// has no placement there
    pub fn status(&self, id: &str) -> Option<DockItemStatus> {
        match self.active_leaf(id) {
            Some(leaf) => Some(leaf.status),
            None => self.items.get(id).map(|item| item.default_status),
        }
    }

    /// Whether the item's content is on screen: visible and docked as the
    /// selected tab, or floating. Auto-hidden content stays collapsed.
    pub fn content_visible(&self, id: &str) -> bool {
        let Some(tree) = self.active_tree() else {
            return false;
        };
        let Some(node_id) = tree.find_dock_group_item(id) else {
            return false;
        };
        let Some(leaf) = tree.leaf(node_id) else {
            return false;
        };
        if !leaf.visible {
            return false;
        }

        match leaf.status {
            DockItemStatus::Floating => true,
            DockItemStatus::AutoHide => false,
            DockItemStatus::Dockable => is_selected_tab(tree, node_id),
        }
    }

    /// Container currently hosting the item's content
    pub fn content_host(&self, id: &str) -> ContentHost {
        self.active_tree()
            .and_then(|tree| tree.get(tree.find_dock_group_item(id)?))
            .map(content_host)
            .unwrap_or(ContentHost::Detached)
    }

    /// Show or hide an item in the active layout.
    ///
    /// An item shown for the first time in this layout is placed at its
    /// default location, or appended to the root when that fails.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), DockError> {
        let item = self.item_ref(id)?.clone();
        let general = self.config.general.clone();
        let tree = self.active_tree_mut()?;

        let node_id = match tree.find_dock_group_item(id) {
            Some(node_id) => node_id,
            None if !visible => return Ok(()),
            None => add_default_item(tree, &item, &general)
                .or_else(|| add_hidden_top_level(tree, &item, &general))
                .ok_or(TreeError::NodeNotFound)?,
        };

        if let Some(leaf) = tree.leaf_mut(node_id) {
            leaf.visible = visible;
        }
        debug!("Item '{}' visible={}", id, visible);

        self.refresh();
        Ok(())
    }

    /// Change the item's status in the active layout.
    ///
    /// Without a placement only the default status is updated.
    pub fn set_status(&mut self, id: &str, status: DockItemStatus) -> Result<(), DockError> {
        let behavior = self.item_ref(id)?.behavior;
        self.status.check(id, behavior, status)?;

        let area = self.area;
        let placed = match self.current.as_deref().and_then(|name| self.layouts.get_mut(name)) {
            Some(tree) => match tree.find_dock_group_item(id) {
                Some(node_id) => {
                    layout::store_allocation(tree);
                    tree.get_mut(node_id)
                        .and_then(|node| self.status.apply(node, status, area))
                }
                None => None,
            },
            None => None,
        };

        match placed {
            Some(previous) => {
                if previous != status {
                    self.events.push(DockEvent::StatusChanged {
                        id: id.to_string(),
                        from: previous,
                        to: status,
                    });
                }
                self.refresh();
            }
            None => {
                if let Some(item) = self.items.get_mut(id) {
                    item.default_status = status;
                }
            }
        }
        Ok(())
    }

    /// Move an item to `spec` in the active layout, keeping its visibility,
    /// status and remembered floating/auto-hide geometry.
    ///
    /// Returns whether the spec resolved. When it does not, the item is
    /// parked as a hidden top-level leaf.
    pub fn set_dock_location(&mut self, id: &str, spec: &str) -> Result<bool, DockError> {
        let item = self.item_ref(id)?.clone();
        if item.behavior.contains(DockItemBehavior::LOCKED) {
            return Err(DockError::Locked(id.to_string()));
        }

        let general = self.config.general.clone();
        let tree = self.active_tree_mut()?;

        let leaf = tree
            .find_dock_group_item(id)
            .and_then(|node_id| tree.leaf(node_id))
            .cloned()
            .unwrap_or_else(|| DockGroupItem::with_state(id, false, item.default_status));
        tree.remove_item_rec(id);

        let hint = SizeHint::for_item(&item, &general);
        let placed = add_item_at_location(tree, leaf.clone(), hint, spec).is_some();
        if !placed {
            warn!("Placement '{}' for '{}' did not resolve, parking it hidden", spec, id);
            tree.add_top_level(
                DockGroupItem {
                    visible: false,
                    ..leaf
                },
                hint.along(Orientation::Horizontal),
            )?;
        }

        self.refresh();
        Ok(placed)
    }

    /// Hide an item the way a user close does.
    ///
    /// Items with `CLOSE_ON_HIDE` are dropped from the registry once they are
    /// hidden in every layout.
    pub fn close(&mut self, id: &str) -> Result<(), DockError> {
        let behavior = self.item_ref(id)?.behavior;
        if behavior.contains(DockItemBehavior::CANT_CLOSE) {
            warn!("Refusing to close '{}'", id);
            return Err(DockError::CloseForbidden(id.to_string()));
        }

        if self.current.is_some() {
            self.set_visible(id, false)?;
        }
        if behavior.contains(DockItemBehavior::CLOSE_ON_HIDE) {
            self.remove_item_if_invisible_in_all_layouts(id);
        }
        Ok(())
    }

    /// Bring an item to the front, selecting its tab
    pub fn present(&mut self, id: &str, give_focus: bool) -> Result<(), DockError> {
        self.item_ref(id)?;
        let tree = self.active_tree_mut()?;
        let Some(node_id) = tree.find_dock_group_item(id) else {
            return Ok(());
        };

        let auto_hidden = tree
            .leaf(node_id)
            .is_some_and(|leaf| leaf.status == DockItemStatus::AutoHide);
        if let (Some(parent), Some(index)) = (tree.parent(node_id), tree.object_index(node_id)) {
            if let Some(group) = tree.group_mut(parent) {
                if group.orientation == Orientation::Tabbed {
                    group.current_tab = index;
                }
            }
        }

        self.events.push(DockEvent::Presented {
            id: id.to_string(),
            give_focus: give_focus || auto_hidden,
        });
        self.update_visible_status();
        Ok(())
    }

    pub fn set_title(&mut self, id: &str, title: impl Into<String>) -> Result<(), DockError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| DockError::UnknownItem(id.to_string()))?;
        item.title = title.into();
        self.events.push(DockEvent::TitleChanged { id: id.to_string() });
        Ok(())
    }

    pub fn set_icon(&mut self, id: &str, icon: Option<String>) -> Result<(), DockError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| DockError::UnknownItem(id.to_string()))?;
        item.icon = icon;
        Ok(())
    }

    pub fn set_behavior(&mut self, id: &str, behavior: DockItemBehavior) -> Result<(), DockError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| DockError::UnknownItem(id.to_string()))?;
        item.behavior = behavior;
        Ok(())
    }

    /// Record a move or resize of the item's floating surface
    pub fn set_floating_rect(&mut self, id: &str, rect: Rectangle) -> Result<(), DockError> {
        self.item_ref(id)?;
        let tree = self.active_tree_mut()?;
        let leaf = tree
            .find_dock_group_item(id)
            .and_then(|node_id| tree.leaf_mut(node_id))
            .ok_or_else(|| DockError::UnknownItem(id.to_string()))?;
        leaf.floating_rect = Some(rect);
        Ok(())
    }

    /// The user closed the item's floating surface: items that cannot be
    /// closed dock again, the rest are hidden
    pub fn request_floating_close(&mut self, id: &str) -> Result<(), DockError> {
        let behavior = self.item_ref(id)?.behavior;
        if behavior.contains(DockItemBehavior::CANT_CLOSE) {
            self.set_status(id, DockItemStatus::Dockable)
        } else {
            self.set_visible(id, false)
        }
    }

    /// Drop an item from every layout and the registry, unless it is still
    /// visible somewhere. Returns whether it was removed.
    pub fn remove_item_if_invisible_in_all_layouts(&mut self, id: &str) -> bool {
        if !self.items.contains_key(id) {
            return false;
        }
        if self.layouts.keys().any(|name| self.visible_in_layout(id, name)) {
            debug!("Item '{}' is still visible in some layout", id);
            return false;
        }

        for tree in self.layouts.values_mut() {
            tree.remove_item_rec(id);
        }
        self.items.shift_remove(id);
        info!("Removed item '{}'", id);
        self.events.push(DockEvent::ItemRemoved { id: id.to_string() });
        self.refresh();
        true
    }

    // Notifications and geometry

    pub fn poll_event(&mut self) -> Option<DockEvent> {
        self.events.pop()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Hand every queued event to `handler` in order. Events raised by the
    /// handler's own calls into the frame are queued behind and delivered in
    /// the same run. Returns the number of events delivered.
    pub fn dispatch_events(&mut self, mut handler: impl FnMut(&mut DockFrame, DockEvent)) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.events.pop() {
            handler(self, event);
            delivered += 1;
        }
        delivered
    }

    /// Lay the active tree out inside `area`
    pub fn relayout(&mut self, area: Rectangle) {
        self.area = area;
        let general = self.config.general.clone();
        if let Ok(tree) = self.active_tree_mut() {
            layout::relayout(tree, area, &general);
        }
    }

    /// Recompute geometry and report visibility changes. Geometry is left
    /// as stored until the frame has been given an area.
    pub(crate) fn refresh(&mut self) {
        if !self.area.is_empty() {
            self.relayout(self.area);
        }
        self.update_visible_status();
    }

    /// Compare every item's visibility with what was last reported and queue
    /// change events for the ones that differ. Content is requested from the
    /// factory the first time an item becomes visible.
    pub fn update_visible_status(&mut self) {
        let ids: Vec<String> = self.items.keys().cloned().collect();

        for id in ids {
            let visible = self.visible(&id);
            let content_visible = self.content_visible(&id);
            let Some(item) = self.items.get_mut(&id) else {
                continue;
            };

            if visible && !item.content_loaded {
                item.content_loaded = true;
                if let Some(factory) = self.factory.as_mut() {
                    factory.create_content(&id);
                }
                self.events.push(DockEvent::ContentRequired { id: id.clone() });
            }
            if item.last_visible != visible {
                item.last_visible = visible;
                self.events.push(DockEvent::VisibleChanged { id: id.clone(), visible });
            }
            if item.last_content_visible != content_visible {
                item.last_content_visible = content_visible;
                self.events.push(DockEvent::ContentVisibleChanged {
                    id,
                    visible: content_visible,
                });
            }
        }
    }
}

/// A docked leaf is on screen unless it sits in a tab stack behind another tab
fn is_selected_tab(tree: &LayoutTree, node_id: NodeId) -> bool {
    let Some(parent) = tree.parent(node_id) else {
        return true;
    };
    match tree.group(parent) {
        Some(group) if group.orientation == Orientation::Tabbed => {
            group.children.get(group.current_tab) == Some(&node_id)
        }
        _ => true,
    }
}
