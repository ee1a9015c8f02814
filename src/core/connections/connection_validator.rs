use crate::core::components::traits::NodeModel;
use crate::core::connections::manager::ConnectionManager;
use crate::core::connections::port_validator::PortValidator;
use crate::core::error::GraphError;
use crate::core::types::{InputPort, OutputPort};

/// Centralized connection validation logic
pub struct ConnectionValidator;

impl ConnectionValidator {
    /// Validate a new edge before it is added to the graph
    ///
    /// Checks, in order: both ports exist, the input accepts the output's
    /// data type, the input has no driver yet, and the edge closes no loop.
    pub fn validate_connection(
        connections: &ConnectionManager,
        source: &OutputPort,
        source_node: &dyn NodeModel,
        target: &InputPort,
        target_node: &dyn NodeModel,
    ) -> Result<(), GraphError> {
        let source_type = PortValidator::validate_source_port(source.node_id(), source_node, source.index())?;
        let target_type = PortValidator::validate_target_port(target.node_id(), target_node, target.index())?;

        if !target_type.accepts(&source_type) {
            return Err(GraphError::DataTypeMismatch {
                source: source_type,
                target: target_type,
            });
        }

        Self::check_input_port_collision(connections, target)?;

        if connections.reaches(target.node_id(), source.node_id()) {
            return Err(GraphError::CycleDetected {
                source: source.node_id().clone(),
                target: target.node_id().clone(),
            });
        }

        Ok(())
    }

    /// Check if an input port is already connected (prevents multiple drivers)
    pub fn check_input_port_collision(
        connections: &ConnectionManager,
        target: &InputPort,
    ) -> Result<(), GraphError> {
        if connections.is_input_connected(&(target.node_id().clone(), target.index())) {
            return Err(GraphError::InputAlreadyConnected {
                node: target.node_id().clone(),
                index: target.index(),
            });
        }
        Ok(())
    }
}
