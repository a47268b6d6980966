use super::DockFrame;
use crate::error::DockError;
use crate::item::DockEvent;
use crate::layout;
use crate::region::build_default_layout;
use crate::tree::LayoutTree;
use tracing::{debug, info, warn};

impl DockFrame {
    /// Create (or replace) the layout `name`.
    ///
    /// With `copy_current` and an active layout the new layout is a snapshot
    /// of it, live sizes included; otherwise it is built from the default
    /// placement of every registered item.
    pub fn create_layout(&mut self, name: &str, copy_current: bool) {
        let snapshot = if copy_current {
            self.active_tree_mut().ok().map(|tree| {
                layout::store_allocation(tree);
                tree.clone()
            })
        } else {
            None
        };

        let tree = match snapshot {
            Some(tree) => tree,
            None => build_default_layout(self.items.values(), &self.config.general),
        };

        info!("Created layout '{}' ({} nodes)", name, tree.len());
        self.layouts.insert(name.to_string(), tree);

        if self.current.as_deref() == Some(name) {
            self.refresh();
        }
    }

    /// Delete a layout that is not the current one.
    ///
    /// Returns whether a layout was removed.
    pub fn delete_layout(&mut self, name: &str) -> Result<bool, DockError> {
        if self.current.as_deref() == Some(name) {
            return Err(DockError::LayoutInUse(name.to_string()));
        }
        let removed = self.layouts.remove(name).is_some();
        if removed {
            info!("Deleted layout '{}'", name);
        }
        Ok(removed)
    }

    pub fn current_layout(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Make `name` the active layout.
    ///
    /// Unknown names leave the current layout in place and return false.
    pub fn set_current_layout(&mut self, name: &str) -> bool {
        if self.current.as_deref() == Some(name) {
            return true;
        }
        if !self.layouts.contains_key(name) {
            warn!("Cannot switch to unknown layout '{}'", name);
            return false;
        }

        if let Ok(tree) = self.active_tree_mut() {
            layout::store_allocation(tree);
        }

        info!("Switching to layout '{}'", name);
        self.current = Some(name.to_string());
        self.events.push(DockEvent::LayoutChanged { name: name.to_string() });
        self.refresh();
        true
    }

    pub fn has_layout(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// Layout names in sorted order
    pub fn layout_names(&self) -> Vec<&str> {
        self.layouts.keys().map(String::as_str).collect()
    }

    pub fn layout(&self, name: &str) -> Option<&LayoutTree> {
        self.layouts.get(name)
    }

    /// Activate the configured default layout when nothing is active,
    /// building it first if needed
    pub fn ensure_default_layout(&mut self) {
        if self.current.is_some() {
            return;
        }

        let name = self.config.layouts.default_layout.clone();
        if !self.has_layout(&name) {
            debug!("Bootstrapping default layout '{}'", name);
            self.create_layout(&name, false);
        }
        self.set_current_layout(&name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::DockItemStatus;
    use crate::tree::{LayoutTreeExt, Rectangle};
    use dockspace_config::Config;

    fn frame() -> DockFrame {
        let mut frame = DockFrame::new(Config::default());
        for id in ["a", "b"] {
            frame.add_item(id).unwrap();
        }
        frame.ensure_default_layout();
        frame.relayout(Rectangle::new(0, 0, 1000, 800));
        frame
    }

    #[test]
    fn test_ensure_default_layout() {
        let mut frame = frame();
        assert_eq!(frame.current_layout(), Some("Default"));
        assert_eq!(frame.layout_names(), vec!["Default"]);

        // Nothing happens once a layout is active
        frame.ensure_default_layout();
        assert_eq!(frame.layout_names().len(), 1);
    }

    #[test]
    fn test_layout_names_are_sorted() {
        let mut frame = frame();
        frame.create_layout("Zeta", false);
        frame.create_layout("Alpha", true);
        assert_eq!(frame.layout_names(), vec!["Alpha", "Default", "Zeta"]);
        assert!(frame.has_layout("Zeta"));
        assert!(frame.layout("Nope").is_none());
    }

    #[test]
    fn test_unknown_layout_switch_is_ignored() {
        let mut frame = frame();
        assert!(!frame.set_current_layout("Nope"));
        assert_eq!(frame.current_layout(), Some("Default"));
    }

    #[test]
    fn test_delete_layout() {
        let mut frame = frame();
        frame.create_layout("Debug", true);

        assert_eq!(
            frame.delete_layout("Default"),
            Err(DockError::LayoutInUse("Default".to_string()))
        );
        assert_eq!(frame.delete_layout("Debug"), Ok(true));
        assert_eq!(frame.delete_layout("Debug"), Ok(false));
    }

    #[test]
    fn test_copied_layout_is_independent() {
        let mut frame = frame();
        frame.set_visible("a", true).unwrap();
        frame.create_layout("Copy", true);

        frame.set_visible("a", false).unwrap();
        assert!(frame.visible_in_layout("a", "Copy"));
        assert!(!frame.visible_in_layout("a", "Default"));

        frame.set_current_layout("Copy");
        assert!(frame.visible("a"));
    }

    #[test]
    fn test_copy_captures_allocated_sizes() {
        let mut frame = frame();
        frame.set_visible("a", true).unwrap();
        frame.set_visible("b", true).unwrap();
        frame.create_layout("Copy", true);

        let tree = frame.layout("Copy").unwrap();
        let width = |id: &str| tree.get(tree.find_dock_group_item(id).unwrap()).unwrap().size;
        let gap = frame.config().general.total_handle_size() as f64;
        assert_eq!(width("a") + width("b") + gap, 1000.0);
    }

    #[test]
    fn test_switch_reports_only_changed_items() {
        let mut frame = frame();
        frame.set_visible("a", true).unwrap();
        frame.create_layout("Other", true);
        frame.set_current_layout("Other");
        frame.set_visible("b", true).unwrap();
        while frame.poll_event().is_some() {}

        frame.set_current_layout("Default");
        let events: Vec<DockEvent> = std::iter::from_fn(|| frame.poll_event()).collect();

        assert_eq!(events[0], DockEvent::LayoutChanged { name: "Default".to_string() });
        let changed: Vec<&str> = events.iter().filter_map(DockEvent::item_id).collect();
        assert!(changed.iter().all(|id| *id == "b"));
        assert!(events.contains(&DockEvent::VisibleChanged { id: "b".to_string(), visible: false }));
    }

    #[test]
    fn test_replacing_current_layout_reports_changes() {
        let mut frame = frame();
        frame.set_visible("a", true).unwrap();
        while frame.poll_event().is_some() {}

        frame.create_layout("Default", false);

        assert_eq!(frame.current_layout(), Some("Default"));
        assert!(!frame.visible("a"));
        let events: Vec<DockEvent> = std::iter::from_fn(|| frame.poll_event()).collect();
        assert!(events.contains(&DockEvent::VisibleChanged { id: "a".to_string(), visible: false }));
        assert!(!events.iter().any(|e| e.item_id() == Some("b")));
    }

    #[test]
    fn test_status_is_per_layout() {
        let mut frame = frame();
        frame.set_visible("a", true).unwrap();
        frame.create_layout("Other", true);
        frame.set_status("a", DockItemStatus::AutoHide).unwrap();

        frame.set_current_layout("Other");
        assert_eq!(frame.status("a"), Some(DockItemStatus::Dockable));
        frame.set_current_layout("Default");
        assert_eq!(frame.status("a"), Some(DockItemStatus::AutoHide));
    }
}
