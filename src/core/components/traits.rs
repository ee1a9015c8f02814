use crate::core::components::port_specs::{PortIndex, PortSpec, PortType};
use crate::core::signals::data_update::DataUpdateNotifier;
use crate::core::values::data_type::DataType;
use crate::core::values::typed_value::NodeValue;
use std::any::Any;

/// Validity of a node as shown next to it in the editor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationState {
    #[default]
    Valid,
    Warning(String),
    Error(String),
}

impl ValidationState {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationState::Valid)
    }
}

/// Port and data contract shared by every node kind
///
/// The graph engine is the only caller of these methods and never calls
/// them concurrently for the same node. Port layout is fixed at
/// construction: `port_count` and `port_data_type` must return the same
/// answers for the whole lifetime of the node.
pub trait NodeModel: Send + Any {
    /// Node type name, used for registration and IDs
    fn name(&self) -> &str;

    /// Title shown on the node
    fn caption(&self) -> String {
        self.name().to_string()
    }

    /// Number of ports in the given direction
    fn port_count(&self, port_type: PortType) -> usize;

    /// Data type carried by a port
    ///
    /// # Panics
    ///
    /// Panics when `index >= self.port_count(port_type)`.
    fn port_data_type(&self, port_type: PortType, index: PortIndex) -> DataType;

    /// Current value of an output port, `None` when there is nothing to offer
    fn out_data(&self, index: PortIndex) -> Option<NodeValue>;

    /// Deliver a value to an input port
    ///
    /// `None` means the upstream connection went away. A value whose tag
    /// differs from the port's data type is ignored without touching node
    /// state.
    ///
    /// # Panics
    ///
    /// Panics when `index >= self.port_count(PortType::In)`.
    fn set_in_data(&mut self, value: Option<NodeValue>, index: PortIndex);

    fn validation_state(&self) -> ValidationState {
        ValidationState::Valid
    }

    /// Receive the handle used to announce output changes to the engine
    fn bind(&mut self, _notifier: DataUpdateNotifier) {}

    /// Stop all external deliveries before the node is dropped
    fn detach(&mut self) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// All port specifications, inputs first
    fn ports(&self) -> Vec<PortSpec> {
        let inputs = (0..self.port_count(PortType::In))
            .map(|index| PortSpec::input(index, self.port_data_type(PortType::In, index)));
        let outputs = (0..self.port_count(PortType::Out))
            .map(|index| PortSpec::output(index, self.port_data_type(PortType::Out, index)));
        inputs.chain(outputs).collect()
    }
}

/// Abort on a port index the node does not have
///
/// An invalid index is an integration bug, never a runtime condition.
pub fn assert_port_index(node: &str, port_type: PortType, index: PortIndex, count: usize) {
    assert!(
        index < count,
        "{:?} port index {} out of range for node {} ({} ports)",
        port_type,
        index,
        node,
        count
    );
}
