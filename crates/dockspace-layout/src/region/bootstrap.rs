use super::resolver::{add_item_at_location, SizeHint};
use crate::item::DockItem;
use crate::tree::{DockGroupItem, LayoutTree, LayoutTreeExt, NodeId, Orientation};
use dockspace_config::GeneralConfig;
use tracing::{debug, warn};

/// Place `item` at its default location in `tree`
pub fn add_default_item(tree: &mut LayoutTree, item: &DockItem, general: &GeneralConfig) -> Option<NodeId> {
    let spec = item.default_location.as_deref()?;
    let leaf = DockGroupItem::with_state(item.id(), item.default_visible, item.default_status);
    add_item_at_location(tree, leaf, SizeHint::for_item(item, general), spec)
}

/// Append `item` to the root as a hidden leaf
pub fn add_hidden_top_level(tree: &mut LayoutTree, item: &DockItem, general: &GeneralConfig) -> Option<NodeId> {
    let leaf = DockGroupItem::with_state(item.id(), false, item.default_status);
    let size = SizeHint::for_item(item, general).along(Orientation::Horizontal);
    match tree.add_top_level(leaf, size) {
        Ok(node_id) => Some(node_id),
        Err(e) => {
            warn!("Could not add '{}' at top level: {}", item.id(), e);
            None
        }
    }
}

/// Build a fresh layout from the default placement of every item.
///
/// Items without a placement spec become hidden top-level leaves. The rest
/// are placed in repeated passes until a pass places nothing, so specs
/// anchored on each other resolve whatever order they come in. Whatever is
/// still unplaced after that becomes a hidden top-level leaf.
pub fn build_default_layout<'a>(
    items: impl IntoIterator<Item = &'a DockItem>,
    general: &GeneralConfig,
) -> LayoutTree {
    let mut tree = LayoutTree::new();
    let mut pending = Vec::new();

    for item in items {
        if item.default_location.is_some() {
            pending.push(item);
        } else {
            add_hidden_top_level(&mut tree, item, general);
        }
    }

    let mut passes = 0;
    loop {
        passes += 1;
        let before = pending.len();
        pending.retain(|item| add_default_item(&mut tree, item, general).is_none());
        if pending.len() == before {
            break;
        }
    }
    debug!("Default layout reached a fixed point after {} passes", passes);

    for item in pending {
        warn!(
            "Default location '{}' of '{}' never resolved, adding it hidden",
            item.default_location.as_deref().unwrap_or_default(),
            item.id()
        );
        add_hidden_top_level(&mut tree, item, general);
    }

    tree
}
