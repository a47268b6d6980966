pub mod container;
pub mod tree;

pub use container::{
    DockGroup, DockGroupItem, DockNode, DockObject, LayoutTree, NodeId, Orientation, Rectangle,
    TreeError,
};
pub use tree::{DockPosition, LayoutTreeExt};
