pub mod events;
pub mod item;
pub mod state;

pub use events::{DockEvent, EventQueue};
pub use item::{ContentFactory, DockItem, DockItemBehavior, DockItemStatus, ItemTemplate};
pub use state::{content_host, nearest_edge, AutoHideEdge, AutoHideInfo, ContentHost, StatusManager};
