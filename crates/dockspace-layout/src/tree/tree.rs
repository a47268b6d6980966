use super::container::{DockGroupItem, DockNode, DockObject, LayoutTree, NodeId, Orientation, TreeError};
use crate::item::DockItemStatus;
use std::collections::HashSet;
use std::fmt::{self, Write as _};
use tracing::{debug, error};

/// Position of a new item relative to an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DockPosition {
    Left,
    Right,
    Top,
    Bottom,
    /// New tab after the anchor
    Center,
    /// New tab before the anchor
    CenterBefore,
}

impl DockPosition {
    /// Orientation of the group that can answer this position directly
    pub fn orientation(&self) -> Orientation {
        match self {
            DockPosition::Left | DockPosition::Right => Orientation::Horizontal,
            DockPosition::Top | DockPosition::Bottom => Orientation::Vertical,
            DockPosition::Center | DockPosition::CenterBefore => Orientation::Tabbed,
        }
    }

    /// Whether the position lies before the anchor in child order
    pub fn is_before(&self) -> bool {
        matches!(
            self,
            DockPosition::Left | DockPosition::Top | DockPosition::CenterBefore
        )
    }
}

/// Structural operations on a layout tree
pub trait LayoutTreeExt {
    /// Insert `item` next to the leaf placing `anchor_id`
    fn add_object(
        &mut self,
        item: DockGroupItem,
        size: f64,
        position: DockPosition,
        anchor_id: &str,
    ) -> Result<NodeId, TreeError>;

    /// Append `item` to the root group
    fn add_top_level(&mut self, item: DockGroupItem, size: f64) -> Result<NodeId, TreeError>;

    /// Remove the leaf placing `item_id`, collapsing groups left with one child
    fn remove_item_rec(&mut self, item_id: &str) -> bool;

    /// Group whose direct child places `item_id`
    fn find_group_containing(&self, item_id: &str) -> Option<NodeId>;

    /// Leaf placing `item_id`
    fn find_dock_group_item(&self, item_id: &str) -> Option<NodeId>;

    /// Index of a node among its parent's children
    fn object_index(&self, node_id: NodeId) -> Option<usize>;

    /// Whether `ancestor` is a strict ancestor of `node_id`
    fn has_ancestor(&self, node_id: NodeId, ancestor: NodeId) -> bool;

    /// Every reachable node in depth-first order, root first
    fn depth_first(&self) -> Vec<NodeId>;
}

impl LayoutTreeExt for LayoutTree {
    fn add_object(
        &mut self,
        item: DockGroupItem,
        size: f64,
        position: DockPosition,
        anchor_id: &str,
    ) -> Result<NodeId, TreeError> {
        if self.find_dock_group_item(&item.item_id).is_some() {
            return Err(TreeError::DuplicateItem(item.item_id));
        }

        let anchor = self
            .find_dock_group_item(anchor_id)
            .ok_or_else(|| TreeError::AnchorNotFound(anchor_id.to_string()))?;
        let anchor_parent = self.parent(anchor).ok_or(TreeError::NodeNotFound)?;
        let parent_orientation = self
            .group(anchor_parent)
            .ok_or(TreeError::NotAGroup)?
            .orientation;

        debug!(
            "Placing '{}' {:?} of '{}' (parent {:?})",
            item.item_id, position, anchor_id, parent_orientation
        );

        let new_id = self.insert(DockNode::item(item, size));

        // Inside a tab stack only tab positions address the anchor itself,
        // directional positions address the whole stack
        let reference = if parent_orientation == Orientation::Tabbed
            && position.orientation() != Orientation::Tabbed
        {
            anchor_parent
        } else {
            anchor
        };

        let sibling_of = self
            .parent(reference)
            .filter(|&p| self.group(p).map(|g| g.orientation) == Some(position.orientation()));

        match sibling_of {
            Some(parent_id) => {
                let index = self.object_index(reference).unwrap_or(0);
                let index = if position.is_before() { index } else { index + 1 };
                self.insert_child(parent_id, index, new_id)?;
            }
            None => self.wrap(reference, position.orientation(), new_id, position.is_before())?,
        }

        Ok(new_id)
    }

    fn add_top_level(&mut self, item: DockGroupItem, size: f64) -> Result<NodeId, TreeError> {
        if self.find_dock_group_item(&item.item_id).is_some() {
            return Err(TreeError::DuplicateItem(item.item_id));
        }

        debug!("Placing '{}' at top level", item.item_id);
        let new_id = self.insert(DockNode::item(item, size));
        let root = self.root();
        self.add_child(root, new_id)?;
        Ok(new_id)
    }

    fn remove_item_rec(&mut self, item_id: &str) -> bool {
        let Some(leaf_id) = self.find_dock_group_item(item_id) else {
            return false;
        };

        debug!("Removing '{}' from layout tree", item_id);

        let parent_id = self.parent(leaf_id);
        if let Some(parent_id) = parent_id {
            self.remove_child(parent_id, leaf_id);
        }
        self.remove(leaf_id);

        if let Some(parent_id) = parent_id {
            self.collapse(parent_id);
        }
        true
    }

    fn find_group_containing(&self, item_id: &str) -> Option<NodeId> {
        self.find_dock_group_item(item_id)
            .and_then(|leaf| self.parent(leaf))
    }

    fn find_dock_group_item(&self, item_id: &str) -> Option<NodeId> {
        self.depth_first()
            .into_iter()
            .find(|&id| self.leaf(id).is_some_and(|leaf| leaf.item_id == item_id))
    }

    fn object_index(&self, node_id: NodeId) -> Option<usize> {
        let parent = self.parent(node_id)?;
        self.group(parent)?
            .children
            .iter()
            .position(|&id| id == node_id)
    }

    fn has_ancestor(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(node_id);
        let mut steps = 0;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.len() {
                invariant_violation("parent chain does not terminate");
                return false;
            }
            current = self.parent(id);
        }
        false
    }

    fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![self.root()];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                invariant_violation("node reachable twice from root");
                return Vec::new();
            }

            let Some(node) = self.get(id) else {
                invariant_violation("dangling child reference");
                return Vec::new();
            };

            order.push(id);
            if let DockObject::Group(group) = &node.object {
                stack.extend(group.children.iter().rev().copied());
            }
        }

        order
    }
}

impl LayoutTree {
    /// Wrap `target` in a new group of `orientation` holding `target` and
    /// `new_id`; the group takes target's place and size
    fn wrap(
        &mut self,
        target: NodeId,
        orientation: Orientation,
        new_id: NodeId,
        new_first: bool,
    ) -> Result<(), TreeError> {
        let (target_size, target_geometry) = {
            let node = self.get(target).ok_or(TreeError::NodeNotFound)?;
            (node.size, node.geometry)
        };
        let new_size = self.get(new_id).map(|node| node.size).unwrap_or(target_size);

        let group_id = self.insert(DockNode {
            size: target_size,
            geometry: target_geometry,
            ..DockNode::group(orientation)
        });
        debug!("Wrapping {:?} in new {:?} group {:?}", target, orientation, group_id);

        self.replace_child(target, group_id);

        if let Some(node) = self.get_mut(target) {
            node.size = new_size;
        }

        if new_first {
            self.add_child(group_id, new_id)?;
            self.add_child(group_id, target)?;
        } else {
            self.add_child(group_id, target)?;
            self.add_child(group_id, new_id)?;
        }

        Ok(())
    }

    /// Prune an empty group or replace a single-child group by its child
    fn collapse(&mut self, group_id: NodeId) {
        if group_id == self.root() {
            return;
        }
        let Some(parent_id) = self.parent(group_id) else {
            return;
        };

        let children = self.children(group_id);
        match children.as_slice() {
            [] => {
                debug!("Pruning empty group {:?}", group_id);
                self.remove_child(parent_id, group_id);
                self.remove(group_id);
                self.collapse(parent_id);
            }
            [only] => {
                debug!("Collapsing single-child group {:?}", group_id);
                let size = self.get(group_id).map(|node| node.size).unwrap_or_default();
                self.replace_child(group_id, *only);
                if let Some(node) = self.get_mut(*only) {
                    node.size = size;
                }
                self.remove(group_id);
            }
            _ => {}
        }
    }

    /// Ids of every placed item in depth-first order
    pub fn item_ids(&self) -> Vec<String> {
        self.depth_first()
            .into_iter()
            .filter_map(|id| self.leaf(id).map(|leaf| leaf.item_id.clone()))
            .collect()
    }

    pub fn contains_item(&self, item_id: &str) -> bool {
        self.find_dock_group_item(item_id).is_some()
    }

    /// Indented text rendering of the tree
    pub fn dump(&self) -> String {
        let mut out = String::new();
        if self.dump_node(self.root(), 0, &mut out).is_err() {
            error!("Could not render layout tree");
        }
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) -> fmt::Result {
        let Some(node) = self.get(id) else {
            return Ok(());
        };
        let indent = "  ".repeat(depth);

        match &node.object {
            DockObject::Group(group) => {
                writeln!(
                    out,
                    "{}{:?} size={} children={}",
                    indent,
                    group.orientation,
                    node.size,
                    group.children.len()
                )?;
                for &child in &group.children {
                    self.dump_node(child, depth + 1, out)?;
                }
                Ok(())
            }
            DockObject::Item(item) => {
                let state = match item.status {
                    DockItemStatus::Dockable => "dockable",
                    DockItemStatus::AutoHide => "autohide",
                    DockItemStatus::Floating => "floating",
                };
                writeln!(
                    out,
                    "{}- {} [{}{}] size={}",
                    indent,
                    item.item_id,
                    state,
                    if item.visible { "" } else { ", hidden" },
                    node.size
                )
            }
        }
    }
}

fn invariant_violation(what: &str) {
    error!("Layout tree invariant violated: {}", what);
    debug_assert!(false, "layout tree invariant violated: {}", what);
}
