use crate::core::bridge::{BridgeTarget, EventBridge, FrameSink};
use crate::core::components::port_specs::{PortIndex, PortType};
use crate::core::components::traits::{assert_port_index, NodeModel, ValidationState};
use crate::core::frame::{CanFrame, Direction};
use crate::core::signals::redraw::RedrawSignal;
use crate::core::values::data_type::{DataType, CAN_FRAME};
use crate::core::values::events::{EventKind, FrameEvent, SendStatus};
use crate::core::values::typed_value::NodeValue;
use log::{debug, trace, warn};
use serde::Deserialize;
use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Settings for a raw frame viewer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CanRawViewConfig {
    /// Title shown on the node
    pub caption: String,
    /// Hand transmit-tagged frames arriving on the input port to the attached sink
    pub forward_input: bool,
}

impl Default for CanRawViewConfig {
    fn default() -> Self {
        Self {
            caption: CanRawView::NAME.to_string(),
            forward_input: true,
        }
    }
}

/// Read-only view of what the viewer currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub current_frame: Option<CanFrame>,
    pub last_event: Option<EventKind>,
    pub validation: ValidationState,
    pub received: u64,
    pub sent: u64,
    pub send_failures: u64,
    pub consumed: u64,
}

#[derive(Default)]
struct ViewState {
    snapshot: ViewSnapshot,
}

/// State shared between the graph side and the transport side
#[derive(Default)]
struct ViewShared {
    state: Mutex<ViewState>,
}

impl ViewShared {
    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BridgeTarget for ViewShared {
    fn frame_received(&self, frame: &CanFrame) {
        let mut state = self.lock();
        state.snapshot.current_frame = Some(frame.clone());
        state.snapshot.last_event = Some(EventKind::Received);
        state.snapshot.received += 1;
    }

    fn frame_sent(&self, status: SendStatus, frame: &CanFrame) {
        let mut state = self.lock();
        let snapshot = &mut state.snapshot;
        snapshot.current_frame = Some(frame.clone());
        snapshot.last_event = Some(EventKind::Sent { status });
        match status {
            SendStatus::Success => {
                snapshot.sent += 1;
                snapshot.validation = ValidationState::Valid;
            }
            SendStatus::Failure => {
                snapshot.send_failures += 1;
                snapshot.validation = ValidationState::Warning(format!("Failed to send {}", frame));
            }
        }
    }
}

/// Sink node showing raw CAN traffic
///
/// One `CanFrame` input, no outputs. Frames reach it from upstream nodes
/// through the input port and from the bus through its [`EventBridge`].
///
/// Input frames are handled by direction: received frames are shown and
/// announced to observers as `Received` events, transmit frames are shown
/// and handed to the attached [`FrameSink`], whose completion report comes
/// back through the bridge as a `Sent` event.
pub struct CanRawView {
    config: CanRawViewConfig,
    shared: Arc<ViewShared>,
    bridge: Arc<EventBridge>,
    sink: Option<Arc<dyn FrameSink>>,
}

impl CanRawView {
    pub const NAME: &'static str = "CanRawView";

    pub fn new() -> Self {
        Self::with_config(CanRawViewConfig::default())
    }

    pub fn with_config(config: CanRawViewConfig) -> Self {
        let shared = Arc::new(ViewShared::default());
        let target: Arc<dyn BridgeTarget> = shared.clone();
        let bridge = Arc::new(EventBridge::new(
            &config.caption,
            target,
            Arc::new(RedrawSignal::new()),
        ));
        Self {
            config,
            shared,
            bridge,
            sink: None,
        }
    }

    /// Handle to give the bus transport
    pub fn bridge(&self) -> Arc<EventBridge> {
        Arc::clone(&self.bridge)
    }

    pub fn redraw(&self) -> Arc<RedrawSignal> {
        Arc::clone(self.bridge.redraw())
    }

    /// Route transmit frames consumed on the input port to a transmit collaborator
    pub fn attach_sink(&mut self, sink: Arc<dyn FrameSink>) {
        self.sink = Some(sink);
    }

    pub fn config(&self) -> &CanRawViewConfig {
        &self.config
    }

    /// Consistent copy of the displayed state
    pub fn snapshot(&self) -> ViewSnapshot {
        self.shared.lock().snapshot.clone()
    }

    pub fn current_frame(&self) -> Option<CanFrame> {
        self.shared.lock().snapshot.current_frame.clone()
    }
}

impl Default for CanRawView {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeModel for CanRawView {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn caption(&self) -> String {
        self.config.caption.clone()
    }

    fn port_count(&self, port_type: PortType) -> usize {
        match port_type {
            PortType::In => 1,
            PortType::Out => 0,
        }
    }

    fn port_data_type(&self, port_type: PortType, index: PortIndex) -> DataType {
        assert_port_index(Self::NAME, port_type, index, self.port_count(port_type));
        CAN_FRAME
    }

    fn out_data(&self, _index: PortIndex) -> Option<NodeValue> {
        None
    }

    fn set_in_data(&mut self, value: Option<NodeValue>, index: PortIndex) {
        assert_port_index(Self::NAME, PortType::In, index, self.port_count(PortType::In));

        let Some(value) = value else {
            trace!("{}: input {} cleared", self.config.caption, index);
            return;
        };
        if !CAN_FRAME.accepts(value.data_type()) {
            debug!(
                "{}: rejected '{}' on CanFrame input {}",
                self.config.caption,
                value.data_type().id,
                index
            );
            return;
        }
        let frame = match value.get::<CanFrame>() {
            Ok(frame) => frame.clone(),
            Err(e) => {
                warn!("{}: CanFrame tag on foreign payload: {}", self.config.caption, e);
                return;
            }
        };

        match frame.direction() {
            Direction::Received => {
                {
                    let mut state = self.shared.lock();
                    let snapshot = &mut state.snapshot;
                    snapshot.current_frame = Some(frame.clone());
                    snapshot.last_event = Some(EventKind::Received);
                    snapshot.received += 1;
                    snapshot.consumed += 1;
                }
                self.bridge.publish(FrameEvent::received(frame));
            }
            Direction::Transmit => {
                {
                    let mut state = self.shared.lock();
                    state.snapshot.current_frame = Some(frame.clone());
                    state.snapshot.consumed += 1;
                }
                match &self.sink {
                    Some(sink) if self.config.forward_input => sink.transmit(frame),
                    Some(_) => trace!("{}: forwarding disabled, {} not sent", self.config.caption, frame),
                    None => debug!("{}: no sink attached, {} not sent", self.config.caption, frame),
                }
            }
        }

        self.bridge.redraw().raise();
    }

    fn validation_state(&self) -> ValidationState {
        self.shared.lock().snapshot.validation.clone()
    }

    fn detach(&mut self) {
        self.bridge.detach();
        self.sink = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
