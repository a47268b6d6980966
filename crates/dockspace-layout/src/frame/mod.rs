mod frame;
mod store;
mod style;

pub use frame::DockFrame;
