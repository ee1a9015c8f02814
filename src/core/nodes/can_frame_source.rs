use crate::core::bridge::{BridgeTarget, EventBridge};
use crate::core::components::port_specs::{PortIndex, PortType};
use crate::core::components::traits::{assert_port_index, NodeModel};
use crate::core::frame::CanFrame;
use crate::core::signals::data_update::DataUpdateNotifier;
use crate::core::signals::redraw::RedrawSignal;
use crate::core::values::data_type::{DataType, CAN_FRAME};
use crate::core::values::events::SendStatus;
use crate::core::values::typed_value::NodeValue;
use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct SourceState {
    latest: Option<CanFrame>,
    notifier: Option<DataUpdateNotifier>,
}

#[derive(Default)]
struct SourceShared {
    state: Mutex<SourceState>,
}

impl SourceShared {
    fn lock(&self) -> MutexGuard<'_, SourceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BridgeTarget for SourceShared {
    fn frame_received(&self, frame: &CanFrame) {
        let notifier = {
            let mut state = self.lock();
            state.latest = Some(frame.clone());
            state.notifier.clone()
        };
        if let Some(notifier) = notifier {
            notifier.data_updated(0);
        }
    }

    // Only bus traffic is published; send reports are surfaced as events.
    fn frame_sent(&self, _status: SendStatus, _frame: &CanFrame) {}
}

/// Source node publishing frames received from a bus transport
///
/// No inputs, one `CanFrame` output carrying the most recently received
/// frame. Each arrival queues a data update for the engine.
pub struct CanFrameSource {
    shared: Arc<SourceShared>,
    bridge: Arc<EventBridge>,
}

impl CanFrameSource {
    pub const NAME: &'static str = "CanFrameSource";

    pub fn new() -> Self {
        let shared = Arc::new(SourceShared::default());
        let target: Arc<dyn BridgeTarget> = shared.clone();
        let bridge = Arc::new(EventBridge::new(Self::NAME, target, Arc::new(RedrawSignal::new())));
        Self { shared, bridge }
    }

    /// Handle to give the bus transport
    pub fn bridge(&self) -> Arc<EventBridge> {
        Arc::clone(&self.bridge)
    }

    pub fn latest(&self) -> Option<CanFrame> {
        self.shared.lock().latest.clone()
    }
}

impl Default for CanFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeModel for CanFrameSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn port_count(&self, port_type: PortType) -> usize {
        match port_type {
            PortType::In => 0,
            PortType::Out => 1,
        }
    }

    fn port_data_type(&self, port_type: PortType, index: PortIndex) -> DataType {
        assert_port_index(Self::NAME, port_type, index, self.port_count(port_type));
        CAN_FRAME
    }

    fn out_data(&self, index: PortIndex) -> Option<NodeValue> {
        assert_port_index(Self::NAME, PortType::Out, index, 1);
        self.shared.lock().latest.clone().map(NodeValue::new)
    }

    fn set_in_data(&mut self, _value: Option<NodeValue>, index: PortIndex) {
        assert_port_index(Self::NAME, PortType::In, index, 0);
    }

    fn bind(&mut self, notifier: DataUpdateNotifier) {
        self.shared.lock().notifier = Some(notifier);
    }

    fn detach(&mut self) {
        self.bridge.detach();
        self.shared.lock().notifier = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
