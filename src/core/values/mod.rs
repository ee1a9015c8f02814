pub mod data_type;
pub mod events;
pub mod typed_value;

// Re-export all public types
pub use data_type::{DataType, GenericBlob, NodeData, CAN_FRAME, GENERIC_BLOB};
pub use events::{EventFilter, EventKind, FrameEvent, SendStatus};
pub use typed_value::NodeValue;
