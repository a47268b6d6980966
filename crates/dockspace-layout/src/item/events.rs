use super::item::DockItemStatus;
use std::collections::VecDeque;

/// Notification for the UI collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockEvent {
    ItemAdded { id: String },
    ItemRemoved { id: String },
    VisibleChanged { id: String, visible: bool },
    ContentVisibleChanged { id: String, visible: bool },
    StatusChanged { id: String, from: DockItemStatus, to: DockItemStatus },
    /// The item's content was built for the first time
    ContentRequired { id: String },
    TitleChanged { id: String },
    Presented { id: String, give_focus: bool },
    LayoutChanged { name: String },
}

impl DockEvent {
    /// Item the event is about, if any
    pub fn item_id(&self) -> Option<&str> {
        match self {
            DockEvent::ItemAdded { id }
            | DockEvent::ItemRemoved { id }
            | DockEvent::VisibleChanged { id, .. }
            | DockEvent::ContentVisibleChanged { id, .. }
            | DockEvent::StatusChanged { id, .. }
            | DockEvent::ContentRequired { id }
            | DockEvent::TitleChanged { id }
            | DockEvent::Presented { id, .. } => Some(id),
            DockEvent::LayoutChanged { .. } => None,
        }
    }
}

/// Outbound FIFO of notifications
#[derive(Debug, Default)]
pub struct EventQueue {
    queue: VecDeque<DockEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: DockEvent) {
        self.queue.push_back(event);
    }

    pub fn pop(&mut self) -> Option<DockEvent> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
