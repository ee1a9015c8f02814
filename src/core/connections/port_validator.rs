use crate::core::components::port_specs::{PortIndex, PortType};
use crate::core::components::traits::NodeModel;
use crate::core::error::GraphError;
use crate::core::types::NodeId;
use crate::core::values::data_type::DataType;

/// Port validation utilities for nodes
///
/// Nodes panic on out-of-range indices, so every index coming from outside
/// the engine goes through here first.
pub struct PortValidator;

impl PortValidator {
    /// Validate that a node has the specified output port, returns its data type
    pub fn validate_source_port(
        node_id: &NodeId,
        node: &dyn NodeModel,
        index: PortIndex,
    ) -> Result<DataType, GraphError> {
        Self::validate_port(node_id, node, PortType::Out, index)
    }

    /// Validate that a node has the specified input port, returns its data type
    pub fn validate_target_port(
        node_id: &NodeId,
        node: &dyn NodeModel,
        index: PortIndex,
    ) -> Result<DataType, GraphError> {
        Self::validate_port(node_id, node, PortType::In, index)
    }

    fn validate_port(
        node_id: &NodeId,
        node: &dyn NodeModel,
        port_type: PortType,
        index: PortIndex,
    ) -> Result<DataType, GraphError> {
        let count = node.port_count(port_type);
        if index >= count {
            return Err(GraphError::PortOutOfRange {
                node: node_id.clone(),
                port_type,
                index,
                count,
            });
        }
        Ok(node.port_data_type(port_type, index))
    }
}
