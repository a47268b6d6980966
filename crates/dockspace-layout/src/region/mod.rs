pub mod bootstrap;
pub mod placement;
pub mod resolver;

pub use bootstrap::{add_default_item, add_hidden_top_level, build_default_layout};
pub use placement::{clauses, PlacementClause, PlacementError};
pub use resolver::{add_item_at_location, in_region, in_region_object, SizeHint};
