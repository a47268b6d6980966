use super::item::{DockItemBehavior, DockItemStatus};
use crate::error::DockError;
use crate::tree::{DockNode, DockObject, Rectangle};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Edge strip of the host window holding auto-hidden items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoHideEdge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Where an auto-hidden item is parked and how far it expands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoHideInfo {
    pub edge: AutoHideEdge,
    pub size: u32,
}

/// Container the item's content is currently attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentHost {
    /// Not shown anywhere
    Detached,
    /// Embedded in the layout tree
    Tree,
    EdgeStrip(AutoHideEdge),
    FloatingSurface(Rectangle),
}

/// Applies status transitions to layout leaves
pub struct StatusManager {
    /// Default floating surface size
    default_width: u32,
    default_height: u32,
}

impl StatusManager {
    pub fn new(default_width: u32, default_height: u32) -> Self {
        Self {
            default_width,
            default_height,
        }
    }

    /// Reject transitions the item's behavior forbids
    pub fn check(
        &self,
        id: &str,
        behavior: DockItemBehavior,
        target: DockItemStatus,
    ) -> Result<(), DockError> {
        let forbidden = match target {
            DockItemStatus::Dockable => false,
            DockItemStatus::AutoHide => behavior.contains(DockItemBehavior::CANT_AUTO_HIDE),
            DockItemStatus::Floating => behavior.contains(DockItemBehavior::NEVER_FLOATING),
        };

        if forbidden {
            return Err(DockError::TransitionForbidden {
                id: id.to_string(),
                status: target,
            });
        }
        Ok(())
    }

    /// Move a leaf to `target`, returning its previous status.
    ///
    /// The leaf stays in the tree whatever its status, so returning to
    /// `Dockable` restores the remembered placement.
    pub fn apply(
        &self,
        node: &mut DockNode,
        target: DockItemStatus,
        area: Rectangle,
    ) -> Option<DockItemStatus> {
        let geometry = node.geometry;
        let DockObject::Item(leaf) = &mut node.object else {
            return None;
        };

        let previous = leaf.status;
        if previous == target {
            return Some(previous);
        }

        match target {
            DockItemStatus::Floating => {
                if leaf.floating_rect.is_none() {
                    leaf.floating_rect = Some(self.centered_rect(area));
                }
            }
            DockItemStatus::AutoHide => {
                let edge = nearest_edge(geometry, area);
                let size = match edge {
                    AutoHideEdge::Left | AutoHideEdge::Right => geometry.width,
                    AutoHideEdge::Top | AutoHideEdge::Bottom => geometry.height,
                };
                let size = if size == 0 { self.default_width / 2 } else { size };
                leaf.auto_hide = Some(AutoHideInfo { edge, size });
            }
            DockItemStatus::Dockable => {}
        }

        debug!("Item '{}' {:?} -> {:?}", leaf.item_id, previous, target);
        leaf.status = target;
        Some(previous)
    }

    /// Default-sized rectangle centered in `area`
    fn centered_rect(&self, area: Rectangle) -> Rectangle {
        let width = i32::try_from(self.default_width).unwrap_or(i32::MAX);
        let height = i32::try_from(self.default_height).unwrap_or(i32::MAX);
        let x = area.x.saturating_add(area.signed_width().saturating_sub(width) / 2);
        let y = area.y.saturating_add(area.signed_height().saturating_sub(height) / 2);
        Rectangle::new(x.max(area.x), y.max(area.y), self.default_width, self.default_height)
    }
}

/// Host container for a leaf in the given state
pub fn content_host(node: &DockNode) -> ContentHost {
    let Some(leaf) = node.as_item() else {
        return ContentHost::Detached;
    };
    if !leaf.visible {
        return ContentHost::Detached;
    }

    match leaf.status {
        DockItemStatus::Dockable => ContentHost::Tree,
        DockItemStatus::AutoHide => {
            ContentHost::EdgeStrip(leaf.auto_hide.map(|info| info.edge).unwrap_or(AutoHideEdge::Left))
        }
        DockItemStatus::Floating => ContentHost::FloatingSurface(leaf.floating_rect.unwrap_or(node.geometry)),
    }
}

/// Edge of `area` closest to the center of `rect`
pub fn nearest_edge(rect: Rectangle, area: Rectangle) -> AutoHideEdge {
    let (cx, cy) = rect.center();
    let candidates = [
        (AutoHideEdge::Left, cx.saturating_sub(area.x)),
        (AutoHideEdge::Right, area.right().saturating_sub(cx)),
        (AutoHideEdge::Top, cy.saturating_sub(area.y)),
        (AutoHideEdge::Bottom, area.bottom().saturating_sub(cy)),
    ];

    candidates
        .into_iter()
        .min_by_key(|(_, distance)| *distance)
        .map(|(edge, _)| edge)
        .unwrap_or(AutoHideEdge::Left)
}
