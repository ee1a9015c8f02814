use crate::core::components::port_specs::PortIndex;
use crate::core::types::NodeId;
use log::trace;
use std::sync::mpsc;

/// An output port whose value changed and needs propagating
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUpdate {
    pub node_id: NodeId,
    pub index: PortIndex,
}

/// Handle a node uses to tell the graph engine an output changed
///
/// Updates go into the engine's queue and are propagated the next time the
/// engine drains it, so this is safe to call from a transport thread.
#[derive(Debug, Clone)]
pub struct DataUpdateNotifier {
    node_id: NodeId,
    tx: mpsc::Sender<DataUpdate>,
}

impl DataUpdateNotifier {
    pub fn new(node_id: NodeId, tx: mpsc::Sender<DataUpdate>) -> Self {
        Self { node_id, tx }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Queue an update for an output port, returns false once the engine is gone
    pub fn data_updated(&self, index: PortIndex) -> bool {
        let update = DataUpdate {
            node_id: self.node_id.clone(),
            index,
        };
        if self.tx.send(update).is_err() {
            trace!("Engine dropped, update from {} discarded", self.node_id);
            return false;
        }
        true
    }
}
