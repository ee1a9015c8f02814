use crate::core::frame::CanFrame;
use crate::core::signals::observers::{EventObservers, SubscriptionId};
use crate::core::signals::redraw::RedrawSignal;
use crate::core::values::events::{EventFilter, FrameEvent, SendStatus};
use log::{debug, trace};
use std::sync::{mpsc, Arc, PoisonError, RwLock};

/// Node-side receiver of bus activity
///
/// Implemented by the shared state of nodes that talk to a transport. Both
/// methods run on the transport's thread and must leave the state fully
/// updated before returning.
pub trait BridgeTarget: Send + Sync {
    fn frame_received(&self, frame: &CanFrame);
    fn frame_sent(&self, status: SendStatus, frame: &CanFrame);
}

/// Outbound half of the transport contract: frames the graph wants sent
pub trait FrameSink: Send + Sync {
    fn transmit(&self, frame: CanFrame);
}

/// Entry point a bus transport uses to push activity into one node.
///
/// Every callback updates node state first, then notifies event observers,
/// then raises redraw, so an observer woken by either sees the complete
/// new state. Callbacks run under the read side of a gate; [`detach`]
/// takes the write side, which waits for in-flight callbacks and turns
/// every later one into a no-op.
///
/// Observers must not call [`detach`] from inside a callback, and must not
/// re-enter the bridge from the callback's thread (for example a sink that
/// reports [`on_frame_sent`] synchronously). Both take the gate again while
/// it is held and can deadlock against a pending detach. Hand such work to
/// another thread.
///
/// [`detach`]: EventBridge::detach
/// [`on_frame_sent`]: EventBridge::on_frame_sent
pub struct EventBridge {
    label: String,
    gate: RwLock<Option<Arc<dyn BridgeTarget>>>,
    observers: EventObservers,
    redraw: Arc<RedrawSignal>,
}

impl EventBridge {
    pub fn new(label: &str, target: Arc<dyn BridgeTarget>, redraw: Arc<RedrawSignal>) -> Self {
        Self {
            label: label.to_string(),
            gate: RwLock::new(Some(target)),
            observers: EventObservers::new(),
            redraw,
        }
    }

    /// A frame arrived on the bus, returns false if the node is detached
    pub fn on_frame_received(&self, frame: CanFrame) -> bool {
        let gate = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        let Some(target) = gate.as_ref() else {
            trace!("{}: dropped received frame {} after detach", self.label, frame);
            return false;
        };

        trace!("{}: received {}", self.label, frame);
        target.frame_received(&frame);
        self.observers.emit(&FrameEvent::received(frame));
        self.redraw.raise();
        true
    }

    /// A transmit attempt completed, returns false if the node is detached
    pub fn on_frame_sent(&self, status: SendStatus, frame: CanFrame) -> bool {
        let gate = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        let Some(target) = gate.as_ref() else {
            trace!("{}: dropped send report for {} after detach", self.label, frame);
            return false;
        };

        if status.is_success() {
            trace!("{}: sent {}", self.label, frame);
        } else {
            debug!("{}: transmit of {} failed", self.label, frame);
        }
        target.frame_sent(status, &frame);
        self.observers.emit(&FrameEvent::sent(status, frame));
        self.redraw.raise();
        true
    }

    /// Notify observers of activity the node already recorded itself
    ///
    /// Used for frames reaching the node through its input port rather than
    /// the transport. The target is not called. Returns false if detached.
    pub fn publish(&self, event: FrameEvent) -> bool {
        let gate = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        if gate.is_none() {
            trace!("{}: dropped event {} after detach", self.label, event.event_id);
            return false;
        }
        self.observers.emit(&event);
        true
    }

    /// Cut the node off from the transport
    ///
    /// Blocks until callbacks already running have finished. Returns false
    /// if the bridge was already detached.
    pub fn detach(&self) -> bool {
        let mut gate = self.gate.write().unwrap_or_else(PoisonError::into_inner);
        let was_attached = gate.take().is_some();
        if was_attached {
            debug!("{}: detached from transport", self.label);
        }
        was_attached
    }

    pub fn is_attached(&self) -> bool {
        self.gate.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    pub fn subscribe<F>(&self, filter: EventFilter, callback: F) -> SubscriptionId
    where
        F: Fn(&FrameEvent) + Send + Sync + 'static,
    {
        self.observers.subscribe(filter, callback)
    }

    pub fn subscribe_channel(&self, filter: EventFilter) -> (SubscriptionId, mpsc::Receiver<FrameEvent>) {
        self.observers.subscribe_channel(filter)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn redraw(&self) -> &Arc<RedrawSignal> {
        &self.redraw
    }
}
