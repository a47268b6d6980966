use crate::tree::{LayoutTree, NodeId, Rectangle};

/// Tab stacks show one child at a time, so every tab gets the full rectangle
pub struct TabbedLayout;

impl TabbedLayout {
    pub fn layout_tabbed(&self, tree: &LayoutTree, parent_id: NodeId, geometry: Rectangle) -> Vec<(NodeId, Rectangle)> {
        tree.children(parent_id)
            .into_iter()
            .map(|child| (child, geometry))
            .collect()
    }
}
