use super::DockFrame;
use crate::region::{in_region, in_region_object};
use crate::tree::NodeId;
use dockspace_config::DockVisualStyle;

impl DockFrame {
    /// Assign a style to every position inside `region`, a placement spec
    /// such as `"Files/Left;Output/Bottom"`. `None` removes it.
    pub fn set_region_style(&mut self, region: &str, style: Option<DockVisualStyle>) {
        self.region_styles.retain(|(spec, _)| spec != region);
        if let Some(style) = style {
            self.region_styles.push((region.to_string(), style));
        }
    }

    pub fn set_dock_item_style(&mut self, id: &str, style: Option<DockVisualStyle>) {
        match style {
            Some(style) => {
                self.item_styles.insert(id.to_string(), style);
            }
            None => {
                self.item_styles.remove(id);
            }
        }
    }

    pub fn default_visual_style(&self) -> DockVisualStyle {
        self.config.default_style()
    }

    /// Default style overlaid with the item's own style
    pub fn region_style_for_item(&self, id: &str) -> DockVisualStyle {
        let mut style = self.default_visual_style();
        if let Some(item_style) = self.item_styles.get(id) {
            style.copy_values_from(item_style);
        }
        style
    }

    /// Style of a node of the active layout: the item style for leaves, then
    /// every region containing the node in registration order
    pub fn region_style_for_object(&self, node_id: NodeId) -> DockVisualStyle {
        let Some(tree) = self.active_tree() else {
            return self.default_visual_style();
        };

        let mut style = match tree.leaf(node_id) {
            Some(leaf) => self.region_style_for_item(&leaf.item_id),
            None => self.default_visual_style(),
        };
        for (spec, region_style) in &self.region_styles {
            if in_region_object(tree, spec, node_id) {
                style.copy_values_from(region_style);
            }
        }
        style
    }

    /// Style a new object would get at child `index` of `parent`
    pub fn region_style_for_position(&self, parent: NodeId, index: isize, inserting: bool) -> DockVisualStyle {
        let mut style = self.default_visual_style();
        let Some(tree) = self.active_tree() else {
            return style;
        };
        for (spec, region_style) in &self.region_styles {
            if in_region(tree, spec, parent, index, inserting) {
                style.copy_values_from(region_style);
            }
        }
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::LayoutTreeExt;
    use dockspace_config::{Color, Config, TabStyle};

    fn frame() -> DockFrame {
        let mut frame = DockFrame::new(Config::default());
        for id in ["left", "center", "right"] {
            frame.add_item(id).unwrap();
        }
        frame.ensure_default_layout();
        frame
    }

    fn tinted(color: Color) -> DockVisualStyle {
        DockVisualStyle {
            pad_background_color: Some(color),
            ..Default::default()
        }
    }

    #[test]
    fn test_item_style_overlays_default() {
        let mut frame = frame();
        let red = Color::rgb(255, 0, 0);
        frame.set_dock_item_style("left", Some(tinted(red)));

        let style = frame.region_style_for_item("left");
        assert_eq!(style.pad_background_color, Some(red));
        assert_eq!(style.tab_style, Some(TabStyle::Normal));
        assert_eq!(frame.region_style_for_item("right"), frame.default_visual_style());

        frame.set_dock_item_style("left", None);
        assert_eq!(frame.region_style_for_item("left"), frame.default_visual_style());
    }

    #[test]
    fn test_region_styles_merge_in_order() {
        let mut frame = frame();
        let blue = Color::rgb(0, 0, 255);
        let green = Color::rgb(0, 255, 0);
        frame.set_region_style("center/Right", Some(tinted(blue)));
        frame.set_region_style(
            "left/Right",
            Some(DockVisualStyle {
                pad_background_color: Some(green),
                uppercase_titles: Some(true),
                ..Default::default()
            }),
        );

        let tree = frame.active_tree().unwrap();
        let right = tree.find_dock_group_item("right").unwrap();
        let style = frame.region_style_for_object(right);
        // Both regions contain "right"; the later one wins
        assert_eq!(style.pad_background_color, Some(green));
        assert_eq!(style.uppercase_titles, Some(true));

        // Replacing a region moves it to the end
        frame.set_region_style("center/Right", Some(tinted(blue)));
        assert_eq!(frame.region_style_for_object(right).pad_background_color, Some(blue));

        let left = frame.active_tree().unwrap().find_dock_group_item("left").unwrap();
        assert_eq!(frame.region_style_for_object(left), frame.default_visual_style());
    }

    #[test]
    fn test_region_style_for_position() {
        let mut frame = frame();
        let blue = Color::rgb(0, 0, 255);
        frame.set_region_style("center/Right", Some(tinted(blue)));
        let root = frame.active_tree().unwrap().root();

        assert_eq!(frame.region_style_for_position(root, 3, true).pad_background_color, Some(blue));
        assert_eq!(frame.region_style_for_position(root, 0, true), frame.default_visual_style());

        frame.set_region_style("center/Right", None);
        assert_eq!(frame.region_style_for_position(root, 3, true), frame.default_visual_style());
    }
}
