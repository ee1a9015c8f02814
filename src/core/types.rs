use crate::core::components::port_specs::PortIndex;
use uuid::Uuid;

/// Node identifier with node type information
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) id: Uuid,
    pub(crate) node_type: String,
}

impl NodeId {
    /// Create a fresh node ID for the given node type
    pub fn new(node_type: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            node_type: node_type.to_string(),
        }
    }

    /// Get the raw UUID
    pub fn uuid(&self) -> Uuid {
        self.id
    }

    /// Get the node type
    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    /// Create an output port handle
    pub fn output(&self, index: PortIndex) -> OutputPort {
        OutputPort {
            node_id: self.clone(),
            index,
        }
    }

    /// Create an input port handle
    pub fn input(&self, index: PortIndex) -> InputPort {
        InputPort {
            node_id: self.clone(),
            index,
        }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.node_type, self.id.simple())
    }
}

/// Handle for an output port
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputPort {
    pub(crate) node_id: NodeId,
    pub(crate) index: PortIndex,
}

impl OutputPort {
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn index(&self) -> PortIndex {
        self.index
    }
}

/// Handle for an input port
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputPort {
    pub(crate) node_id: NodeId,
    pub(crate) index: PortIndex,
}

impl InputPort {
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn index(&self) -> PortIndex {
        self.index
    }
}
