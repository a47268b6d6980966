//! Docking-window layout engine.
//!
//! A [`DockFrame`] keeps a registry of dock items and a set of named
//! layouts. Each layout is a [`LayoutTree`] of split and tabbed groups whose
//! leaves place items with a per-layout visibility and status. Items are
//! placed relative to each other with placement specs such as
//! `"Files/Left;Output/Bottom"`.

pub mod error;
pub mod frame;
pub mod item;
pub mod layout;
pub mod persist;
pub mod region;
pub mod tree;

// Re-export commonly used types
pub use error::DockError;
pub use frame::DockFrame;
pub use item::{
    AutoHideEdge, AutoHideInfo, ContentFactory, ContentHost, DockEvent, DockItem, DockItemBehavior,
    DockItemStatus, ItemTemplate,
};
pub use persist::{LayoutsDocument, PersistError};
pub use region::{in_region, in_region_object, PlacementError};
pub use tree::{DockPosition, LayoutTree, LayoutTreeExt, NodeId, Orientation, Rectangle, TreeError};
