//! Geometry allocation for a layout tree

pub mod split;
pub mod tabbed;

pub use split::SplitLayout;
pub use tabbed::TabbedLayout;

use crate::tree::{DockObject, LayoutTree, NodeId, Orientation, Rectangle};
use dockspace_config::GeneralConfig;
use tracing::debug;

/// Whether a node takes space in its parent: a leaf when it is visible and
/// docked, a group when any of its descendants does
pub fn is_node_visible(tree: &LayoutTree, node_id: NodeId) -> bool {
    let mut stack = vec![node_id];
    let mut steps = 0;
    while let Some(id) = stack.pop() {
        steps += 1;
        if steps > tree.len() {
            return false;
        }
        match tree.get(id).map(|node| &node.object) {
            Some(DockObject::Item(leaf)) if leaf.is_docked_visible() => return true,
            Some(DockObject::Group(group)) => stack.extend(group.children.iter().copied()),
            _ => {}
        }
    }
    false
}

/// Compute the geometry of every node so the tree fills `area`
pub fn relayout(tree: &mut LayoutTree, area: Rectangle, general: &GeneralConfig) {
    let split = SplitLayout::new(general);
    let mut pending = vec![(tree.root(), area)];

    while let Some((node_id, geometry)) = pending.pop() {
        let Some(node) = tree.get_mut(node_id) else {
            continue;
        };
        node.geometry = geometry;

        let orientation = match &node.object {
            DockObject::Group(group) => group.orientation,
            DockObject::Item(_) => continue,
        };

        let placed = match orientation {
            Orientation::Horizontal | Orientation::Vertical => {
                split.layout_split(tree, node_id, orientation, geometry)
            }
            Orientation::Tabbed => TabbedLayout.layout_tabbed(tree, node_id, geometry),
        };
        pending.extend(placed);
    }

    debug!("Relayout into {}x{} at ({}, {})", area.width, area.height, area.x, area.y);
}

/// Copy the lengths allocated by the last relayout back into each node's
/// `size`, so they survive cloning and saving
pub fn store_allocation(tree: &mut LayoutTree) {
    let mut updates = Vec::new();

    for (_, node) in tree.iter() {
        let Some(group) = node.as_group() else {
            continue;
        };
        for &child in &group.children {
            if !is_node_visible(tree, child) {
                continue;
            }
            let Some(geometry) = tree.get(child).map(|child| child.geometry) else {
                continue;
            };
            let length = match group.orientation {
                Orientation::Horizontal => geometry.width,
                Orientation::Vertical => geometry.height,
                Orientation::Tabbed => continue,
            };
            if length > 0 {
                updates.push((child, length as f64));
            }
        }
    }

    for (child, size) in updates {
        if let Some(node) = tree.get_mut(child) {
            node.size = size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DockGroupItem, DockPosition, LayoutTreeExt};

    fn general() -> GeneralConfig {
        GeneralConfig {
            handle_size: 0,
            handle_padding: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_relayout_nested_groups() {
        let mut tree = LayoutTree::new();
        tree.add_top_level(DockGroupItem::new("a"), 100.0).unwrap();
        tree.add_top_level(DockGroupItem::new("b"), 100.0).unwrap();
        tree.add_object(DockGroupItem::new("c"), 100.0, DockPosition::Bottom, "b").unwrap();

        relayout(&mut tree, Rectangle::new(0, 0, 400, 300), &general());

        let geometry = |id: &str| tree.get(tree.find_dock_group_item(id).unwrap()).unwrap().geometry;
        assert_eq!(geometry("a"), Rectangle::new(0, 0, 200, 300));
        assert_eq!(geometry("b"), Rectangle::new(200, 0, 200, 150));
        assert_eq!(geometry("c"), Rectangle::new(200, 150, 200, 150));
        assert_eq!(tree.get(tree.root()).unwrap().geometry, Rectangle::new(0, 0, 400, 300));
    }

    #[test]
    fn test_group_of_hidden_leaves_is_invisible() {
        let mut tree = LayoutTree::new();
        tree.add_top_level(DockGroupItem::with_state("a", false, Default::default()), 100.0).unwrap();
        tree.add_object(DockGroupItem::with_state("b", false, Default::default()), 100.0, DockPosition::Bottom, "a")
            .unwrap();
        let column = tree.find_group_containing("a").unwrap();

        assert!(!is_node_visible(&tree, column));
        assert!(!is_node_visible(&tree, tree.root()));

        let leaf = tree.find_dock_group_item("b").unwrap();
        tree.leaf_mut(leaf).unwrap().visible = true;
        assert!(is_node_visible(&tree, column));
    }

    #[test]
    fn test_store_allocation_keeps_lengths() {
        let mut tree = LayoutTree::new();
        tree.add_top_level(DockGroupItem::new("a"), 1.0).unwrap();
        tree.add_top_level(DockGroupItem::new("b"), 3.0).unwrap();

        relayout(&mut tree, Rectangle::new(0, 0, 800, 600), &general());
        store_allocation(&mut tree);

        let size = |id: &str| tree.get(tree.find_dock_group_item(id).unwrap()).unwrap().size;
        assert_eq!(size("a"), 200.0);
        assert_eq!(size("b"), 600.0);

        // Stored sizes reproduce the same split
        let before: Vec<Rectangle> = tree.iter().map(|(_, node)| node.geometry).collect();
        relayout(&mut tree, Rectangle::new(0, 0, 800, 600), &general());
        let after: Vec<Rectangle> = tree.iter().map(|(_, node)| node.geometry).collect();
        assert_eq!(before, after);
    }
}
