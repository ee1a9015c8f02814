use crate::core::components::port_specs::{PortIndex, PortType};
use crate::core::components::traits::{assert_port_index, NodeModel};
use crate::core::frame::{CanFrame, MAX_EXTENDED_ID};
use crate::core::signals::data_update::DataUpdateNotifier;
use crate::core::values::data_type::{DataType, CAN_FRAME};
use crate::core::values::typed_value::NodeValue;
use log::{debug, trace};
use serde::Deserialize;
use std::any::Any;

/// Acceptance filter in the usual CAN controller form
///
/// A frame passes when `frame.id & mask == id & mask`. A zero mask
/// accepts every identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub id: u32,
    pub mask: u32,
    /// Restrict to extended (`Some(true)`) or standard (`Some(false)`) frames
    pub extended: Option<bool>,
}

impl FilterConfig {
    /// Accept exactly one identifier
    pub fn exact(id: u32) -> Self {
        Self {
            id,
            mask: MAX_EXTENDED_ID,
            extended: None,
        }
    }

    pub fn matches(&self, frame: &CanFrame) -> bool {
        if let Some(extended) = self.extended {
            if frame.is_extended() != extended {
                return false;
            }
        }
        frame.id() & self.mask == self.id & self.mask
    }
}

/// Transform node passing frames that match an acceptance filter
pub struct FrameFilter {
    config: FilterConfig,
    accepted: Option<CanFrame>,
    dropped: u64,
    notifier: Option<DataUpdateNotifier>,
}

impl FrameFilter {
    pub const NAME: &'static str = "FrameFilter";

    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            accepted: None,
            dropped: 0,
            notifier: None,
        }
    }

    pub fn pass_all() -> Self {
        Self::new(FilterConfig::default())
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Frames rejected by the filter so far
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn publish(&self) {
        if let Some(notifier) = &self.notifier {
            notifier.data_updated(0);
        }
    }
}

impl NodeModel for FrameFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn port_count(&self, _port_type: PortType) -> usize {
        1
    }

    fn port_data_type(&self, port_type: PortType, index: PortIndex) -> DataType {
        assert_port_index(Self::NAME, port_type, index, 1);
        CAN_FRAME
    }

    fn out_data(&self, index: PortIndex) -> Option<NodeValue> {
        assert_port_index(Self::NAME, PortType::Out, index, 1);
        self.accepted.clone().map(NodeValue::new)
    }

    fn set_in_data(&mut self, value: Option<NodeValue>, index: PortIndex) {
        assert_port_index(Self::NAME, PortType::In, index, 1);

        let Some(value) = value else {
            if self.accepted.take().is_some() {
                self.publish();
            }
            return;
        };
        if !CAN_FRAME.accepts(value.data_type()) {
            debug!("{}: rejected '{}' input", Self::NAME, value.data_type().id);
            return;
        }
        let Ok(frame) = value.get::<CanFrame>() else {
            debug!("{}: CanFrame tag on {} payload", Self::NAME, value.type_name());
            return;
        };

        if self.config.matches(frame) {
            self.accepted = Some(frame.clone());
            self.publish();
        } else {
            trace!("{}: dropped {}", Self::NAME, frame);
            self.dropped += 1;
        }
    }

    fn bind(&mut self, notifier: DataUpdateNotifier) {
        self.notifier = Some(notifier);
    }

    fn detach(&mut self) {
        self.notifier = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
