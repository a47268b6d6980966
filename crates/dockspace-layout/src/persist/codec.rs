use crate::item::{AutoHideInfo, DockItemStatus};
use crate::tree::{DockGroupItem, DockNode, DockObject, LayoutTree, NodeId, Orientation, Rectangle};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::io::{Read, Write};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed layouts document: {0}")]
    Json(#[from] serde_json::Error),
}

/// One node of a saved layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectDoc {
    Group(GroupDoc),
    Item(ItemDoc),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDoc {
    pub orientation: Orientation,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub current_tab: usize,
    #[serde(default)]
    pub children: Vec<ObjectDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDoc {
    pub id: String,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub status: DockItemStatus,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub geometry: Rectangle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floating: Option<Rectangle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_hide: Option<AutoHideInfo>,
}

/// Every named layout plus the name of the one that was active
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    #[serde(default)]
    pub layouts: BTreeMap<String, ObjectDoc>,
}

/// Same shape with layouts left undecoded, so one bad layout does not
/// spoil the others
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    current: Option<String>,
    #[serde(default)]
    layouts: BTreeMap<String, serde_json::Value>,
}

impl LayoutsDocument {
    /// Parse a document, skipping layouts that do not decode
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PersistError> {
        let raw: RawDocument = serde_json::from_reader(reader)?;

        let mut layouts = BTreeMap::new();
        for (name, value) in raw.layouts {
            match serde_json::from_value::<ObjectDoc>(value) {
                Ok(doc @ ObjectDoc::Group(_)) => {
                    layouts.insert(name, doc);
                }
                Ok(ObjectDoc::Item(_)) => warn!("Skipping layout '{}': root is not a group", name),
                Err(e) => warn!("Skipping layout '{}': {}", name, e),
            }
        }

        Ok(Self {
            current: raw.current,
            layouts,
        })
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), PersistError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Every item id referenced by any layout, sorted and deduplicated
    pub fn item_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        let mut stack: Vec<&ObjectDoc> = self.layouts.values().collect();
        while let Some(doc) = stack.pop() {
            match doc {
                ObjectDoc::Group(group) => stack.extend(group.children.iter()),
                ObjectDoc::Item(item) => ids.push(item.id.clone()),
            }
        }
        ids.sort();
        ids.dedup();
        ids
    }
}

/// Snapshot a tree as a document node
pub fn encode_tree(tree: &LayoutTree) -> ObjectDoc {
    encode_node(tree, tree.root()).unwrap_or_else(|| {
        ObjectDoc::Group(GroupDoc {
            orientation: Orientation::Horizontal,
            size: 0.0,
            current_tab: 0,
            children: Vec::new(),
        })
    })
}

fn encode_node(tree: &LayoutTree, node_id: NodeId) -> Option<ObjectDoc> {
    let node = tree.get(node_id)?;
    let doc = match &node.object {
        DockObject::Group(group) => ObjectDoc::Group(GroupDoc {
            orientation: group.orientation,
            size: node.size,
            current_tab: group.current_tab,
            children: group
                .children
                .iter()
                .filter_map(|&child| encode_node(tree, child))
                .collect(),
        }),
        DockObject::Item(leaf) => ObjectDoc::Item(ItemDoc {
            id: leaf.item_id.clone(),
            visible: leaf.visible,
            status: leaf.status,
            size: node.size,
            geometry: node.geometry,
            floating: leaf.floating_rect,
            auto_hide: leaf.auto_hide,
        }),
    };
    Some(doc)
}

/// Rebuild a tree from a document node.
///
/// Leaves whose id is not `known`, or that repeat an id already placed, are
/// dropped. Groups left empty by that are dropped too, and a group left with
/// a single child is replaced by it. Returns None when the root is not a
/// group.
pub fn decode_tree(doc: &ObjectDoc, known: impl Fn(&str) -> bool) -> Option<LayoutTree> {
    let ObjectDoc::Group(root_doc) = doc else {
        return None;
    };

    let mut tree = LayoutTree::with_root(root_doc.orientation);
    let root = tree.root();
    let mut placed = HashSet::new();

    if let Some(node) = tree.get_mut(root) {
        node.size = root_doc.size;
    }
    for child in &root_doc.children {
        if let Some(child_id) = decode_node(&mut tree, child, &known, &mut placed) {
            let _ = tree.add_child(root, child_id);
        }
    }
    if let Some(group) = tree.group_mut(root) {
        group.current_tab = root_doc.current_tab.min(group.children.len().saturating_sub(1));
    }

    Some(tree)
}

fn decode_node(
    tree: &mut LayoutTree,
    doc: &ObjectDoc,
    known: &impl Fn(&str) -> bool,
    placed: &mut HashSet<String>,
) -> Option<NodeId> {
    match doc {
        ObjectDoc::Item(item) => {
            if !known(&item.id) {
                warn!("Dropping leaf for unregistered item '{}'", item.id);
                return None;
            }
            if !placed.insert(item.id.clone()) {
                warn!("Dropping duplicate leaf for '{}'", item.id);
                return None;
            }

            let leaf = DockGroupItem {
                floating_rect: item.floating,
                auto_hide: item.auto_hide,
                ..DockGroupItem::with_state(item.id.clone(), item.visible, item.status)
            };
            Some(tree.insert(DockNode {
                geometry: item.geometry,
                ..DockNode::item(leaf, item.size)
            }))
        }
        ObjectDoc::Group(group) => {
            let children: Vec<NodeId> = group
                .children
                .iter()
                .filter_map(|child| decode_node(tree, child, known, placed))
                .collect();

            match children.len() {
                0 => None,
                1 if group.children.len() > 1 => {
                    let only = children[0];
                    if let Some(node) = tree.get_mut(only) {
                        node.size = group.size;
                    }
                    Some(only)
                }
                _ => {
                    let current_tab = group.current_tab.min(children.len() - 1);
                    let group_id = tree.insert(DockNode {
                        size: group.size,
                        ..DockNode::group(group.orientation)
                    });
                    for child in children {
                        let _ = tree.add_child(group_id, child);
                    }
                    if let Some(node) = tree.group_mut(group_id) {
                        node.current_tab = current_tab;
                    }
                    Some(group_id)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DockPosition, LayoutTreeExt};

    fn sample_tree() -> LayoutTree {
        let mut tree = LayoutTree::new();
        tree.add_top_level(DockGroupItem::new("files"), 250.0).unwrap();
        tree.add_top_level(DockGroupItem::new("editor"), 700.0).unwrap();
        tree.add_object(DockGroupItem::new("output"), 200.0, DockPosition::Bottom, "editor")
            .unwrap();
        tree.add_object(
            DockGroupItem::with_state("search", false, DockItemStatus::Floating),
            200.0,
            DockPosition::Center,
            "output",
        )
        .unwrap();
        let search = tree.find_dock_group_item("search").unwrap();
        tree.leaf_mut(search).unwrap().floating_rect = Some(Rectangle::new(10, 20, 640, 480));
        tree
    }

    #[test]
    fn test_document_shape() {
        let doc = LayoutsDocument {
            current: Some("Default".to_string()),
            layouts: BTreeMap::from([("Default".to_string(), encode_tree(&sample_tree()))]),
        };
        let value = serde_json::to_value(&doc).unwrap();

        let root = &value["layouts"]["Default"];
        assert_eq!(root["type"], "group");
        assert_eq!(root["orientation"], "horizontal");
        assert_eq!(root["children"][0]["type"], "item");
        assert_eq!(root["children"][0]["id"], "files");
        assert_eq!(root["children"][0]["status"], "dockable");
        assert!(root["children"][0].get("floating").is_none());
        assert_eq!(root["children"][1]["orientation"], "vertical");
        assert_eq!(value["current"], "Default");
    }

    #[test]
    fn test_tree_survives_encoding() {
        let tree = sample_tree();
        let doc = encode_tree(&tree);
        let decoded = decode_tree(&doc, |_| true).unwrap();

        assert_eq!(encode_tree(&decoded), doc);
        let search = decoded.leaf(decoded.find_dock_group_item("search").unwrap()).unwrap();
        assert_eq!(search.status, DockItemStatus::Floating);
        assert!(!search.visible);
        assert_eq!(search.floating_rect, Some(Rectangle::new(10, 20, 640, 480)));
    }

    #[test]
    fn test_unknown_items_are_dropped() {
        let doc = encode_tree(&sample_tree());
        let decoded = decode_tree(&doc, |id| id != "search" && id != "files").unwrap();

        assert_eq!(decoded.item_ids(), vec!["editor".to_string(), "output".to_string()]);
        // The tab stack lost a tab and collapsed into its remaining child
        let output = decoded.find_group_containing("output").unwrap();
        assert_eq!(decoded.group(output).unwrap().orientation, Orientation::Vertical);
    }

    #[test]
    fn test_duplicate_leaves_are_dropped() {
        let json = r#"{"type":"group","orientation":"horizontal","children":[
            {"type":"item","id":"a","visible":true,"status":"dockable","size":1.0},
            {"type":"item","id":"a","visible":true,"status":"dockable","size":1.0}
        ]}"#;
        let doc: ObjectDoc = serde_json::from_str(json).unwrap();
        let tree = decode_tree(&doc, |_| true).unwrap();
        assert_eq!(tree.item_ids(), vec!["a".to_string()]);
    }

    #[test]
    fn test_bad_layout_is_skipped() {
        let json = r#"{
            "current": "Good",
            "layouts": {
                "Good": {"type":"group","orientation":"vertical","children":[]},
                "Bad": {"type":"group","orientation":"diagonal"},
                "Leaf": {"type":"item","id":"a"}
            }
        }"#;
        let doc = LayoutsDocument::from_reader(json.as_bytes()).unwrap();

        assert_eq!(doc.layouts.keys().collect::<Vec<_>>(), vec!["Good"]);
        assert_eq!(doc.current.as_deref(), Some("Good"));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(matches!(
            LayoutsDocument::from_reader("not json".as_bytes()),
            Err(PersistError::Json(_))
        ));
    }

    #[test]
    fn test_item_ids() {
        let doc = LayoutsDocument {
            current: None,
            layouts: BTreeMap::from([
                ("A".to_string(), encode_tree(&sample_tree())),
                ("B".to_string(), encode_tree(&sample_tree())),
            ]),
        };
        assert_eq!(doc.item_ids(), vec!["editor", "files", "output", "search"]);
    }
}
