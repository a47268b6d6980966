use crate::item::DockItemStatus;
use crate::tree::TreeError;
use thiserror::Error;

/// Errors returned by dock frame operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DockError {
    #[error("Item '{0}' is not registered")]
    UnknownItem(String),
    #[error("Item '{0}' is already registered")]
    DuplicateItem(String),
    #[error("Layout '{0}' does not exist")]
    UnknownLayout(String),
    #[error("Layout '{0}' is the current layout and cannot be deleted")]
    LayoutInUse(String),
    #[error("Item '{id}' cannot switch to {status:?}")]
    TransitionForbidden { id: String, status: DockItemStatus },
    #[error("Item '{0}' cannot be closed")]
    CloseForbidden(String),
    #[error("Item '{0}' is locked in place")]
    Locked(String),
    #[error("No layout is active")]
    NoActiveLayout,
    #[error(transparent)]
    Tree(#[from] TreeError),
}
