use crate::core::frame::CanFrame;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global event ID counter for unique event identification
static EVENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique event ID
fn next_event_id() -> u64 {
    EVENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Outcome of a transmit attempt as reported by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SendStatus {
    Success,
    Failure,
}

impl SendStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, SendStatus::Success)
    }
}

impl From<bool> for SendStatus {
    fn from(ok: bool) -> Self {
        if ok {
            SendStatus::Success
        } else {
            SendStatus::Failure
        }
    }
}

/// What happened on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Received,
    Sent { status: SendStatus },
}

/// Filter used when subscribing to a bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    All,
    Received,
    Sent,
}

impl EventFilter {
    pub fn matches(&self, kind: &EventKind) -> bool {
        match (self, kind) {
            (EventFilter::All, _) => true,
            (EventFilter::Received, EventKind::Received) => true,
            (EventFilter::Sent, EventKind::Sent { .. }) => true,
            _ => false,
        }
    }
}

/// Transient record of bus activity handed to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameEvent {
    pub event_id: u64,
    pub kind: EventKind,
    pub frame: CanFrame,
}

impl FrameEvent {
    pub fn received(frame: CanFrame) -> Self {
        Self {
            event_id: next_event_id(),
            kind: EventKind::Received,
            frame,
        }
    }

    pub fn sent(status: SendStatus, frame: CanFrame) -> Self {
        Self {
            event_id: next_event_id(),
            kind: EventKind::Sent { status },
            frame,
        }
    }
}
