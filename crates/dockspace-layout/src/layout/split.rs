use super::is_node_visible;
use crate::tree::{LayoutTree, NodeId, Orientation, Rectangle};
use dockspace_config::GeneralConfig;

/// Splits a group's rectangle between its visible children
pub struct SplitLayout {
    /// Space between two neighbours, handle included (in pixels)
    pub gap_width: i32,
}

impl SplitLayout {
    pub fn new(general: &GeneralConfig) -> Self {
        Self {
            gap_width: i32::try_from(general.total_handle_size()).unwrap_or(i32::MAX),
        }
    }

    /// Lay out the children of a horizontal or vertical group.
    ///
    /// Lengths are proportional to each child's `size`; the last visible
    /// child takes whatever rounding leaves over. Hidden children get an
    /// empty rectangle at the group's origin.
    pub fn layout_split(
        &self,
        tree: &LayoutTree,
        parent_id: NodeId,
        orientation: Orientation,
        geometry: Rectangle,
    ) -> Vec<(NodeId, Rectangle)> {
        let children = tree.children(parent_id);
        let (visible, hidden): (Vec<NodeId>, Vec<NodeId>) =
            children.into_iter().partition(|&child| is_node_visible(tree, child));

        let mut placed: Vec<(NodeId, Rectangle)> = hidden
            .into_iter()
            .map(|child| (child, Rectangle::new(geometry.x, geometry.y, 0, 0)))
            .collect();

        if visible.is_empty() {
            return placed;
        }

        let length = match orientation {
            Orientation::Vertical => geometry.signed_height(),
            _ => geometry.signed_width(),
        };
        let count = i32::try_from(visible.len()).unwrap_or(i32::MAX);
        let total_gap = (count - 1).saturating_mul(self.gap_width);
        let available = length.saturating_sub(total_gap).max(0);

        let sizes: Vec<f64> = visible
            .iter()
            .map(|&child| tree.get(child).map(|node| node.size.max(0.0)).unwrap_or(0.0))
            .collect();
        let total: f64 = sizes.iter().sum();

        let start = match orientation {
            Orientation::Vertical => geometry.y,
            _ => geometry.x,
        };
        let end = start.saturating_add(length);
        let mut offset = start;

        for (i, &child_id) in visible.iter().enumerate() {
            let child_length = if i == visible.len() - 1 {
                end.saturating_sub(offset).max(0)
            } else if total > 0.0 {
                (available as f64 * sizes[i] / total).floor() as i32
            } else {
                available / count
            };

            let child_extent = u32::try_from(child_length).unwrap_or(0);
            let child_geometry = match orientation {
                Orientation::Vertical => {
                    Rectangle::new(geometry.x, offset, geometry.width, child_extent)
                }
                _ => Rectangle::new(offset, geometry.y, child_extent, geometry.height),
            };
            placed.push((child_id, child_geometry));

            offset = offset.saturating_add(child_length).saturating_add(self.gap_width);
        }

        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DockGroupItem, LayoutTreeExt};

    fn general() -> GeneralConfig {
        GeneralConfig::default()
    }

    #[test]
    fn test_horizontal_split_is_proportional() {
        let mut tree = LayoutTree::new();
        tree.add_top_level(DockGroupItem::new("a"), 100.0).unwrap();
        tree.add_top_level(DockGroupItem::new("b"), 300.0).unwrap();
        let layout = SplitLayout::new(&general());
        let gap = layout.gap_width;

        let root = tree.root();
        let placed = layout.layout_split(&tree, root, Orientation::Horizontal, Rectangle::new(0, 0, 400 + gap as u32, 200));

        assert_eq!(placed[0].1, Rectangle::new(0, 0, 100, 200));
        assert_eq!(placed[1].1, Rectangle::new(100 + gap, 0, 300, 200));
    }

    #[test]
    fn test_vertical_split_last_takes_remainder() {
        let mut tree = LayoutTree::with_root(Orientation::Vertical);
        for id in ["a", "b", "c"] {
            tree.add_top_level(DockGroupItem::new(id), 1.0).unwrap();
        }
        let layout = SplitLayout { gap_width: 0 };

        let root = tree.root();
        let placed = layout.layout_split(&tree, root, Orientation::Vertical, Rectangle::new(0, 0, 50, 100));

        assert_eq!(placed[0].1.height, 33);
        assert_eq!(placed[1].1.y, 33);
        assert_eq!(placed[2].1, Rectangle::new(0, 66, 50, 34));
    }

    #[test]
    fn test_hidden_children_take_no_space() {
        let mut tree = LayoutTree::new();
        tree.add_top_level(DockGroupItem::new("a"), 100.0).unwrap();
        let hidden = tree
            .add_top_level(DockGroupItem::with_state("b", false, Default::default()), 100.0)
            .unwrap();
        let layout = SplitLayout { gap_width: 6 };

        let root = tree.root();
        let placed = layout.layout_split(&tree, root, Orientation::Horizontal, Rectangle::new(0, 0, 500, 100));

        assert_eq!(placed.len(), 2);
        assert!(placed.contains(&(hidden, Rectangle::new(0, 0, 0, 0))));
        let (_, visible) = placed.iter().find(|(id, _)| *id != hidden).unwrap();
        assert_eq!(*visible, Rectangle::new(0, 0, 500, 100));
    }

    #[test]
    fn test_oversized_area_saturates() {
        let mut tree = LayoutTree::new();
        tree.add_top_level(DockGroupItem::new("a"), 1.0).unwrap();
        tree.add_top_level(DockGroupItem::new("b"), 1.0).unwrap();
        let layout = SplitLayout { gap_width: 0 };

        let root = tree.root();
        let placed = layout.layout_split(&tree, root, Orientation::Horizontal, Rectangle::new(0, 0, u32::MAX, 10));

        let half = i32::MAX / 2;
        assert_eq!(placed[0].1, Rectangle::new(0, 0, half as u32, 10));
        assert_eq!(placed[1].1, Rectangle::new(half, 0, (i32::MAX - half) as u32, 10));
    }
}
