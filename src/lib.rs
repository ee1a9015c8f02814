//! Typed dataflow node model for CAN bus tooling.
//!
//! Nodes expose fixed, typed ports; a [`GraphEngine`] owns them, validates
//! connections and propagates values. Bus transports push frames into
//! nodes through an [`EventBridge`] from their own threads.

pub mod core;

// Re-export commonly used types
pub use crate::core::bridge::{BridgeTarget, EventBridge, FrameSink};
pub use crate::core::components::{NodeModel, PortIndex, PortSpec, PortType, ValidationState};
pub use crate::core::error::{FrameError, GraphError};
pub use crate::core::execution::{ConcurrencyMode, EngineConfig, GraphEngine};
pub use crate::core::frame::{CanFrame, Direction, FrameFlags};
pub use crate::core::nodes::{CanFrameSource, CanRawView, CanRawViewConfig, FilterConfig, FrameFilter, ViewSnapshot};
pub use crate::core::signals::{RedrawSignal, SubscriptionId};
pub use crate::core::types::{InputPort, NodeId, OutputPort};
pub use crate::core::values::{DataType, EventFilter, EventKind, FrameEvent, NodeValue, SendStatus};
