use crate::core::components::port_specs::PortIndex;
use crate::core::types::NodeId;
use std::collections::{HashMap, HashSet, VecDeque};

/// A port on a specific node
pub type PortKey = (NodeId, PortIndex);

/// Connection bookkeeping for the graph
///
/// Outputs fan out to any number of inputs; each input has at most one
/// source.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    /// (source_id, output) -> Vec<(target_id, input)>
    connections: HashMap<PortKey, Vec<PortKey>>,
    /// (target_id, input) -> (source_id, output)
    sources: HashMap<PortKey, PortKey>,
}

impl ConnectionManager {
    /// Create a new connection manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection, the caller has validated it
    pub fn add_connection(&mut self, source: PortKey, target: PortKey) {
        self.connections
            .entry(source.clone())
            .or_default()
            .push(target.clone());
        self.sources.insert(target, source);
    }

    /// Remove one connection, returns false if it did not exist
    pub fn remove_connection(&mut self, source: &PortKey, target: &PortKey) -> bool {
        if self.sources.get(target) != Some(source) {
            return false;
        }
        self.sources.remove(target);
        if let Some(targets) = self.connections.get_mut(source) {
            targets.retain(|t| t != target);
            if targets.is_empty() {
                self.connections.remove(source);
            }
        }
        true
    }

    /// Drop every connection touching a node, returns the inputs it was feeding
    pub fn remove_node(&mut self, node_id: &NodeId) -> Vec<PortKey> {
        let outgoing: Vec<PortKey> = self
            .connections
            .iter()
            .filter(|((source_id, _), _)| source_id == node_id)
            .flat_map(|(_, targets)| targets.iter().cloned())
            .collect();

        self.connections.retain(|(source_id, _), _| source_id != node_id);
        for targets in self.connections.values_mut() {
            targets.retain(|(target_id, _)| target_id != node_id);
        }
        self.connections.retain(|_, targets| !targets.is_empty());
        self.sources
            .retain(|(target_id, _), (source_id, _)| target_id != node_id && source_id != node_id);

        outgoing
            .into_iter()
            .filter(|(target_id, _)| target_id != node_id)
            .collect()
    }

    /// Get targets for a source port
    pub fn targets(&self, source: &PortKey) -> &[PortKey] {
        self.connections.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Get the source feeding an input port
    pub fn source_of(&self, target: &PortKey) -> Option<&PortKey> {
        self.sources.get(target)
    }

    pub fn is_input_connected(&self, target: &PortKey) -> bool {
        self.sources.contains_key(target)
    }

    /// Check if `to` is reachable from `from` along connections
    pub fn reaches(&self, from: &NodeId, to: &NodeId) -> bool {
        let mut seen: HashSet<&NodeId> = HashSet::new();
        let mut queue: VecDeque<&NodeId> = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            for ((source_id, _), targets) in &self.connections {
                if source_id == current {
                    queue.extend(targets.iter().map(|(target_id, _)| target_id));
                }
            }
        }
        false
    }

    /// Get connection statistics
    pub fn stats(&self) -> ConnectionStats {
        ConnectionStats {
            connected_outputs: self.connections.len(),
            connected_inputs: self.sources.len(),
        }
    }
}

/// Connection statistics for debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionStats {
    pub connected_outputs: usize,
    pub connected_inputs: usize,
}
