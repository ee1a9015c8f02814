pub mod port_specs;
pub mod registry;
pub mod traits;

// Re-export commonly used types
pub use port_specs::{PortIndex, PortSpec, PortType};
pub use registry::{DataTypeRegistry, NodeFactory, NodeRegistry};
pub use traits::{assert_port_index, NodeModel, ValidationState};
