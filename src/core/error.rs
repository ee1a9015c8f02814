use crate::core::components::port_specs::{PortIndex, PortType};
use crate::core::types::NodeId;
use crate::core::values::data_type::DataType;

/// Errors raised while constructing a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Identifier does not fit the 11-bit or 29-bit range
    IdentifierOutOfRange { id: u32, extended: bool },
    /// Payload longer than the frame format allows
    PayloadTooLong { len: usize, max: usize },
    /// CAN FD payload length with no DLC encoding
    InvalidFdLength(usize),
    /// Remote frames carry no data
    RemoteWithPayload(usize),
    /// CAN FD has no remote frames
    RemoteFlexibleDataRate,
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::IdentifierOutOfRange { id, extended } => {
                let width = if *extended { 29 } else { 11 };
                write!(f, "Identifier 0x{:X} does not fit in {} bits", id, width)
            }
            FrameError::PayloadTooLong { len, max } => {
                write!(f, "Payload of {} bytes exceeds limit of {}", len, max)
            }
            FrameError::InvalidFdLength(len) => {
                write!(f, "CAN FD payload of {} bytes has no DLC encoding", len)
            }
            FrameError::RemoteWithPayload(len) => {
                write!(f, "Remote frame cannot carry a payload ({} bytes given)", len)
            }
            FrameError::RemoteFlexibleDataRate => write!(f, "Remote frames are not allowed in CAN FD"),
        }
    }
}

impl std::error::Error for FrameError {}

/// Error types for graph operations
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Node not found
    NodeNotFound(NodeId),
    /// Port index beyond the node's port count
    PortOutOfRange {
        node: NodeId,
        port_type: PortType,
        index: PortIndex,
        count: usize,
    },
    /// Output and input carry different data types
    DataTypeMismatch { source: DataType, target: DataType },
    /// Input ports accept a single connection
    InputAlreadyConnected { node: NodeId, index: PortIndex },
    /// No such connection
    ConnectionNotFound,
    /// Connection would close a loop
    CycleDetected { source: NodeId, target: NodeId },
    /// No factory registered under this name
    UnknownNodeType(String),
    /// A factory already exists under this name
    DuplicateNodeType(String),
    /// Port uses a data type the graph does not know
    UnknownDataType(String),
    /// Update queue did not settle
    PropagationLimitExceeded(usize),
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::NodeNotFound(id) => write!(f, "Node not found: {}", id),
            GraphError::PortOutOfRange {
                node,
                port_type,
                index,
                count,
            } => write!(
                f,
                "{:?} port {} out of range on node '{}' ({} ports)",
                port_type, index, node, count
            ),
            GraphError::DataTypeMismatch { source, target } => write!(
                f,
                "Data type mismatch: output carries '{}', input expects '{}'",
                source.id, target.id
            ),
            GraphError::InputAlreadyConnected { node, index } => write!(
                f,
                "Input port {} on node '{}' is already connected",
                index, node
            ),
            GraphError::ConnectionNotFound => write!(f, "Connection not found"),
            GraphError::CycleDetected { source, target } => write!(
                f,
                "Connecting '{}' to '{}' would create a cycle",
                source, target
            ),
            GraphError::UnknownNodeType(name) => write!(f, "Unknown node type: {}", name),
            GraphError::DuplicateNodeType(name) => write!(f, "Node type already registered: {}", name),
            GraphError::UnknownDataType(id) => write!(f, "Unknown data type: {}", id),
            GraphError::PropagationLimitExceeded(steps) => {
                write!(f, "Propagation did not settle after {} steps", steps)
            }
        }
    }
}

impl std::error::Error for GraphError {}
