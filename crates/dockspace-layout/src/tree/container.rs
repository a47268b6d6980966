use crate::item::{AutoHideInfo, DockItemStatus};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

new_key_type! {
    /// Unique identifier for a node inside one layout tree
    pub struct NodeId;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node not found in layout tree")]
    NodeNotFound,
    #[error("Node is not a group and cannot have children")]
    NotAGroup,
    #[error("Item '{0}' is already placed in this layout")]
    DuplicateItem(String),
    #[error("Anchor item '{0}' is not placed in this layout")]
    AnchorNotFound(String),
}

/// How a group arranges its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Side by side, answers Left/Right
    Horizontal,
    /// Top and bottom, answers Top/Bottom
    Vertical,
    /// Stacked tabs, answers Center/CenterBefore
    Tabbed,
}

/// Rectangle for geometry calculations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Width in the signed coordinate space, saturating at `i32::MAX`
    pub fn signed_width(&self) -> i32 {
        i32::try_from(self.width).unwrap_or(i32::MAX)
    }

    pub fn signed_height(&self) -> i32 {
        i32::try_from(self.height).unwrap_or(i32::MAX)
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.signed_width())
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.signed_height())
    }

    /// True until the rectangle has been given a real extent
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.x.saturating_add(self.signed_width() / 2),
            self.y.saturating_add(self.signed_height() / 2),
        )
    }
}

/// Composite node arranging its children under one orientation
#[derive(Debug, Clone, PartialEq)]
pub struct DockGroup {
    pub orientation: Orientation,
    pub children: Vec<NodeId>,
    /// Selected page of a tabbed group
    pub current_tab: usize,
}

impl DockGroup {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            children: Vec::new(),
            current_tab: 0,
        }
    }
}

/// Leaf placing one dock item, with the state it has in this layout
#[derive(Debug, Clone, PartialEq)]
pub struct DockGroupItem {
    pub item_id: String,
    pub visible: bool,
    pub status: DockItemStatus,
    /// Last rectangle of the floating surface, kept while docked
    pub floating_rect: Option<Rectangle>,
    /// Edge strip the item collapses into while auto-hidden
    pub auto_hide: Option<AutoHideInfo>,
}

impl DockGroupItem {
    pub fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            visible: true,
            status: DockItemStatus::Dockable,
            floating_rect: None,
            auto_hide: None,
        }
    }

    pub fn with_state(item_id: impl Into<String>, visible: bool, status: DockItemStatus) -> Self {
        Self {
            visible,
            status,
            ..Self::new(item_id)
        }
    }

    /// Whether this leaf takes space in the docked arrangement
    pub fn is_docked_visible(&self) -> bool {
        self.visible && self.status == DockItemStatus::Dockable
    }
}

/// Either side of the tree's sum type
#[derive(Debug, Clone, PartialEq)]
pub enum DockObject {
    Group(DockGroup),
    Item(DockGroupItem),
}

/// A node in the layout tree
#[derive(Debug, Clone, PartialEq)]
pub struct DockNode {
    /// Parent group (None for root)
    pub parent: Option<NodeId>,

    /// Share of the parent's length along its split axis
    pub size: f64,

    /// Last allocated geometry
    pub geometry: Rectangle,

    pub object: DockObject,
}

impl DockNode {
    pub fn group(orientation: Orientation) -> Self {
        Self {
            parent: None,
            size: 0.0,
            geometry: Rectangle::default(),
            object: DockObject::Group(DockGroup::new(orientation)),
        }
    }

    pub fn item(item: DockGroupItem, size: f64) -> Self {
        Self {
            parent: None,
            size,
            geometry: Rectangle::default(),
            object: DockObject::Item(item),
        }
    }

    pub fn as_group(&self) -> Option<&DockGroup> {
        match &self.object {
            DockObject::Group(group) => Some(group),
            DockObject::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&DockGroupItem> {
        match &self.object {
            DockObject::Item(item) => Some(item),
            DockObject::Group(_) => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.object, DockObject::Group(_))
    }
}

/// One layout's arrangement: an arena of nodes under a root group
#[derive(Debug, Clone)]
pub struct LayoutTree {
    /// All nodes indexed by NodeId
    nodes: SlotMap<NodeId, DockNode>,

    /// Root group of the tree
    root: NodeId,
}

impl LayoutTree {
    /// Create a tree holding an empty horizontal root group
    pub fn new() -> Self {
        Self::with_root(Orientation::Horizontal)
    }

    pub fn with_root(orientation: Orientation) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(DockNode::group(orientation));
        Self { nodes, root }
    }

    /// Insert a detached node and return its ID
    pub fn insert(&mut self, node: DockNode) -> NodeId {
        self.nodes.insert(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&DockNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut DockNode> {
        self.nodes.get_mut(id)
    }

    /// Remove a node from the arena (does not unlink it from its parent)
    pub fn remove(&mut self, id: NodeId) -> Option<DockNode> {
        self.nodes.remove(id)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn set_root(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
        self.root = id;
    }

    pub fn group(&self, id: NodeId) -> Option<&DockGroup> {
        self.get(id).and_then(DockNode::as_group)
    }

    pub fn group_mut(&mut self, id: NodeId) -> Option<&mut DockGroup> {
        match self.nodes.get_mut(id).map(|node| &mut node.object) {
            Some(DockObject::Group(group)) => Some(group),
            _ => None,
        }
    }

    pub fn leaf(&self, id: NodeId) -> Option<&DockGroupItem> {
        self.get(id).and_then(DockNode::as_item)
    }

    pub fn leaf_mut(&mut self, id: NodeId) -> Option<&mut DockGroupItem> {
        match self.nodes.get_mut(id).map(|node| &mut node.object) {
            Some(DockObject::Item(item)) => Some(item),
            _ => None,
        }
    }

    /// Append a child to a group
    pub fn add_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<(), TreeError> {
        let len = self.group(parent_id).ok_or(TreeError::NotAGroup)?.children.len();
        self.insert_child(parent_id, len, child_id)
    }

    /// Insert a child into a group at `index` (clamped to the child count)
    pub fn insert_child(
        &mut self,
        parent_id: NodeId,
        index: usize,
        child_id: NodeId,
    ) -> Result<(), TreeError> {
        if !self.nodes.contains_key(child_id) {
            return Err(TreeError::NodeNotFound);
        }

        let group = self.group_mut(parent_id).ok_or(TreeError::NotAGroup)?;
        let index = index.min(group.children.len());
        group.children.insert(index, child_id);

        if let Some(child) = self.nodes.get_mut(child_id) {
            child.parent = Some(parent_id);
        }

        Ok(())
    }

    /// Unlink a child from its parent group
    pub fn remove_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        if let Some(group) = self.group_mut(parent_id) {
            group.children.retain(|&id| id != child_id);
            if group.current_tab >= group.children.len() {
                group.current_tab = group.children.len().saturating_sub(1);
            }
        }

        if let Some(child) = self.nodes.get_mut(child_id) {
            child.parent = None;
        }
    }

    /// Replace `old` by `new` at the same position in old's parent
    pub(crate) fn replace_child(&mut self, old: NodeId, new: NodeId) {
        let Some(parent_id) = self.parent(old) else {
            self.set_root(new);
            return;
        };

        if let Some(group) = self.group_mut(parent_id) {
            if let Some(slot) = group.children.iter_mut().find(|id| **id == old) {
                *slot = new;
            }
        }
        if let Some(node) = self.nodes.get_mut(new) {
            node.parent = Some(parent_id);
        }
        if let Some(node) = self.nodes.get_mut(old) {
            node.parent = None;
        }
    }

    /// Get all children of a group (empty for leaves)
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.group(id)
            .map(|group| group.children.clone())
            .unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Iterate through every node in the arena, attached or not
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DockNode)> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}
