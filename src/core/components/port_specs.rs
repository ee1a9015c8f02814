use crate::core::values::data_type::DataType;
use serde::{Deserialize, Serialize};

/// Ordinal of a port within one direction of a node
pub type PortIndex = usize;

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    /// Input port - receives data from other nodes
    In,
    /// Output port - sends data to other nodes
    Out,
}

impl PortType {
    /// Check if this port type can be connected to another port type
    pub fn can_connect_to(&self, other: &PortType) -> bool {
        matches!((self, other), (PortType::Out, PortType::In))
    }

    /// Get a human-readable description of this port type
    pub fn description(&self) -> &'static str {
        match self {
            PortType::In => "Input port that receives data from other nodes",
            PortType::Out => "Output port that sends data to other nodes",
        }
    }
}

/// Port specification for node inputs and outputs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortSpec {
    /// Port direction
    pub port_type: PortType,
    /// Ordinal within the direction
    pub index: PortIndex,
    /// Data type carried by the port
    pub data_type: DataType,
}

impl PortSpec {
    /// Create an input port
    pub fn input(index: PortIndex, data_type: DataType) -> Self {
        Self {
            port_type: PortType::In,
            index,
            data_type,
        }
    }

    /// Create an output port
    pub fn output(index: PortIndex, data_type: DataType) -> Self {
        Self {
            port_type: PortType::Out,
            index,
            data_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::values::data_type::CAN_FRAME;

    #[test]
    fn test_port_direction_rules() {
        assert!(PortType::Out.can_connect_to(&PortType::In));
        assert!(!PortType::In.can_connect_to(&PortType::Out));
        assert!(!PortType::In.can_connect_to(&PortType::In));
        assert!(!PortType::Out.can_connect_to(&PortType::Out));
    }

    #[test]
    fn test_port_spec_identity() {
        let a = PortSpec::input(0, CAN_FRAME);
        let b = PortSpec::output(0, CAN_FRAME);
        assert_ne!(a, b);
        assert_eq!(a, PortSpec::input(0, CAN_FRAME));
    }
}
