use super::codec::{decode_tree, encode_tree, LayoutsDocument, PersistError};
use crate::frame::DockFrame;
use crate::layout;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

impl DockFrame {
    /// Snapshot every layout, capturing the active layout's live sizes first
    pub fn layouts_document(&mut self) -> LayoutsDocument {
        if let Ok(tree) = self.active_tree_mut() {
            layout::store_allocation(tree);
        }

        LayoutsDocument {
            current: self.current.clone(),
            layouts: self
                .layouts
                .iter()
                .map(|(name, tree)| (name.clone(), encode_tree(tree)))
                .collect(),
        }
    }

    pub fn save_layouts<W: Write>(&mut self, writer: W) -> Result<(), PersistError> {
        let doc = self.layouts_document();
        doc.to_writer(writer)?;
        info!("Saved {} layouts", doc.layouts.len());
        Ok(())
    }

    /// Replace every layout with the ones in `reader`.
    ///
    /// Leaves naming unregistered items are dropped. The layout that was
    /// current before the load stays current when the document has it,
    /// then the document's own current layout, then the default one. When
    /// the document cannot be parsed at all the frame is left with a freshly
    /// built default layout and the error is returned.
    pub fn load_layouts<R: Read>(&mut self, reader: R) -> Result<(), PersistError> {
        let previous = self.current.take();
        self.layouts.clear();

        let doc = match LayoutsDocument::from_reader(reader) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Could not read layouts, using the default layout: {}", e);
                self.ensure_default_layout();
                return Err(e);
            }
        };

        for (name, object) in &doc.layouts {
            let tree = decode_tree(object, |id| self.items.contains_key(id));
            match tree {
                Some(tree) => {
                    debug!("Loaded layout '{}' with {} nodes", name, tree.len());
                    self.layouts.insert(name.clone(), tree);
                }
                None => warn!("Skipping layout '{}'", name),
            }
        }
        info!("Loaded {} layouts", self.layouts.len());

        let candidates = [
            previous,
            doc.current.clone(),
            Some(self.config.layouts.default_layout.clone()),
        ];
        let active = candidates
            .into_iter()
            .flatten()
            .find(|name| self.layouts.contains_key(name));

        match active {
            Some(name) => {
                self.set_current_layout(&name);
            }
            None => self.ensure_default_layout(),
        }
        Ok(())
    }

    pub fn save_layouts_to_path(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create layouts directory: {:?}", parent))?;
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create layouts file: {:?}", path))?;
        let mut writer = BufWriter::new(file);
        self.save_layouts(&mut writer)
            .with_context(|| format!("Failed to write layouts to {:?}", path))?;
        writer
            .flush()
            .with_context(|| format!("Failed to write layouts to {:?}", path))?;

        info!("Layouts saved to {:?}", path);
        Ok(())
    }

    pub fn load_layouts_from_path(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open layouts file: {:?}", path))?;
        self.load_layouts(BufReader::new(file))
            .with_context(|| format!("Failed to parse layouts file: {:?}", path))?;

        info!("Layouts loaded from {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::frame::DockFrame;
    use crate::item::DockItemStatus;
    use crate::persist::LayoutsDocument;
    use crate::tree::{LayoutTreeExt, Rectangle};
    use dockspace_config::Config;

    fn frame(ids: &[&str]) -> DockFrame {
        let mut frame = DockFrame::new(Config::default());
        for id in ids {
            frame.add_item(id).unwrap();
        }
        frame
    }

    #[test]
    fn test_save_and_load_keep_every_layout() {
        let mut source = frame(&["a", "b"]);
        source.ensure_default_layout();
        source.relayout(Rectangle::new(0, 0, 800, 600));
        source.set_visible("a", true).unwrap();
        source.set_visible("b", true).unwrap();
        source.set_status("b", DockItemStatus::Floating).unwrap();
        source.create_layout("Debug", true);
        source.set_current_layout("Debug");

        let mut bytes = Vec::new();
        source.save_layouts(&mut bytes).unwrap();

        let mut target = frame(&["a", "b"]);
        target.load_layouts(bytes.as_slice()).unwrap();

        assert_eq!(target.layout_names(), vec!["Debug", "Default"]);
        assert_eq!(target.current_layout(), Some("Debug"));
        assert_eq!(target.status("b"), Some(DockItemStatus::Floating));
        assert_eq!(target.layouts_document(), source.layouts_document());
    }

    #[test]
    fn test_load_keeps_stored_geometry() {
        let mut source = frame(&["a", "b"]);
        source.ensure_default_layout();
        source.relayout(Rectangle::new(0, 0, 800, 600));
        source.set_visible("a", true).unwrap();
        source.set_visible("b", true).unwrap();
        let mut saved = Vec::new();
        source.save_layouts(&mut saved).unwrap();

        // No area is ever given to the target
        let mut target = frame(&["a", "b"]);
        target.load_layouts(saved.as_slice()).unwrap();
        let mut resaved = Vec::new();
        target.save_layouts(&mut resaved).unwrap();

        assert_eq!(
            LayoutsDocument::from_reader(resaved.as_slice()).unwrap(),
            LayoutsDocument::from_reader(saved.as_slice()).unwrap()
        );
        let tree = target.active_tree().unwrap();
        let a = tree.get(tree.find_dock_group_item("a").unwrap()).unwrap();
        assert_eq!(a.geometry.height, 600);
        assert!(a.geometry.width > 0);
    }

    #[test]
    fn test_previous_layout_stays_current() {
        let mut source = frame(&["a"]);
        source.ensure_default_layout();
        source.create_layout("Debug", false);
        let mut bytes = Vec::new();
        source.save_layouts(&mut bytes).unwrap();

        let mut target = frame(&["a"]);
        target.ensure_default_layout();
        target.create_layout("Debug", false);
        target.set_current_layout("Debug");
        target.load_layouts(bytes.as_slice()).unwrap();

        assert_eq!(target.current_layout(), Some("Debug"));
    }

    #[test]
    fn test_unregistered_leaves_are_dropped() {
        let mut source = frame(&["a", "gone"]);
        source.ensure_default_layout();
        let mut bytes = Vec::new();
        source.save_layouts(&mut bytes).unwrap();

        let mut target = frame(&["a"]);
        target.load_layouts(bytes.as_slice()).unwrap();
        assert_eq!(target.active_tree().unwrap().item_ids(), vec!["a".to_string()]);
    }

    #[test]
    fn test_unreadable_document_falls_back_to_default() {
        let mut target = frame(&["a"]);
        assert!(target.load_layouts("{ broken".as_bytes()).is_err());

        assert_eq!(target.current_layout(), Some("Default"));
        assert!(target.active_tree().unwrap().contains_item("a"));
    }

    #[test]
    fn test_empty_document_bootstraps_default() {
        let mut target = frame(&["a"]);
        target.load_layouts("{}".as_bytes()).unwrap();
        assert_eq!(target.layout_names(), vec!["Default"]);
    }

    #[test]
    fn test_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("layouts.json");

        let mut source = frame(&["a"]);
        source.ensure_default_layout();
        source.save_layouts_to_path(&path).unwrap();

        let mut target = frame(&["a"]);
        target.load_layouts_from_path(&path).unwrap();
        assert_eq!(target.current_layout(), Some("Default"));

        assert!(target.load_layouts_from_path(&dir.path().join("missing.json")).is_err());
    }
}
