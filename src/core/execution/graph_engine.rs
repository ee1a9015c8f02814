use crate::core::components::port_specs::PortIndex;
use crate::core::components::registry::{DataTypeRegistry, NodeRegistry};
use crate::core::components::traits::NodeModel;
use crate::core::connections::{ConnectionManager, ConnectionStats, ConnectionValidator, PortKey, PortValidator};
use crate::core::error::GraphError;
use crate::core::execution::config::{ConcurrencyMode, EngineConfig};
use crate::core::signals::data_update::{DataUpdate, DataUpdateNotifier};
use crate::core::types::{InputPort, NodeId, OutputPort};
use crate::core::values::data_type::DataType;
use crate::core::values::typed_value::NodeValue;
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use std::collections::{HashMap, VecDeque};
use std::sync::mpsc;

/// Owner and traversal actor of a node graph
///
/// All `NodeModel` calls happen on the thread that owns the engine. Nodes
/// fed by a transport announce new output values through their
/// [`DataUpdateNotifier`]; those updates queue up until
/// [`process_updates`](GraphEngine::process_updates) drains them.
pub struct GraphEngine {
    config: EngineConfig,
    nodes: HashMap<NodeId, Box<dyn NodeModel>>,
    connections: ConnectionManager,
    node_registry: NodeRegistry,
    data_types: DataTypeRegistry,
    updates_tx: mpsc::Sender<DataUpdate>,
    updates_rx: mpsc::Receiver<DataUpdate>,
    backlog: VecDeque<DataUpdate>,
    thread_pool: Option<rayon::ThreadPool>,
}

impl GraphEngine {
    /// Create an engine with default configuration and built-in registries
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let thread_pool = match (config.concurrency_mode, config.thread_pool_size) {
            (ConcurrencyMode::Rayon, Some(size)) => {
                match rayon::ThreadPoolBuilder::new().num_threads(size).build() {
                    Ok(pool) => Some(pool),
                    Err(e) => {
                        warn!("Failed to build thread pool of {} threads, using global pool: {}", size, e);
                        None
                    }
                }
            }
            _ => None,
        };
        let (updates_tx, updates_rx) = mpsc::channel();

        Self {
            config,
            nodes: HashMap::new(),
            connections: ConnectionManager::new(),
            node_registry: NodeRegistry::with_builtin(),
            data_types: DataTypeRegistry::with_builtin(),
            updates_tx,
            updates_rx,
            backlog: VecDeque::new(),
            thread_pool,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn node_registry_mut(&mut self) -> &mut NodeRegistry {
        &mut self.node_registry
    }

    /// Make a data type available to node ports, returns false if already known
    pub fn register_data_type(&mut self, data_type: DataType) -> bool {
        self.data_types.register(data_type)
    }

    pub fn data_types(&self) -> &DataTypeRegistry {
        &self.data_types
    }

    /// Take ownership of a node and give it an ID
    ///
    /// Every port must use a registered data type.
    pub fn add_node(&mut self, mut node: Box<dyn NodeModel>) -> Result<NodeId, GraphError> {
        if let Some(port) = node.ports().into_iter().find(|port| !self.data_types.contains(&port.data_type)) {
            return Err(GraphError::UnknownDataType(port.data_type.id.to_string()));
        }

        let id = NodeId::new(node.name());
        node.bind(DataUpdateNotifier::new(id.clone(), self.updates_tx.clone()));
        debug!("Added node {} ({})", id, node.caption());
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }

    /// Instantiate a registered node kind
    pub fn add_node_by_name(&mut self, name: &str) -> Result<NodeId, GraphError> {
        let node = self.node_registry.create(name)?;
        self.add_node(node)
    }

    /// Detach a node from its transport, drop its edges and destroy it
    ///
    /// Once this returns no bridge callback runs against the node. Inputs
    /// the node was feeding receive `None`.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<(), GraphError> {
        let mut node = self
            .nodes
            .remove(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        node.detach();

        for (target_id, index) in self.connections.remove_node(id) {
            if let Some(target) = self.nodes.get_mut(&target_id) {
                target.set_in_data(None, index);
            }
        }

        info!("Removed node {}", id);
        Ok(())
    }

    /// Connect an output port to an input port
    ///
    /// The input immediately receives the output's current value, if any.
    pub fn connect(&mut self, source: OutputPort, target: InputPort) -> Result<(), GraphError> {
        let source_node = self
            .nodes
            .get(source.node_id())
            .ok_or_else(|| GraphError::NodeNotFound(source.node_id().clone()))?;
        let target_node = self
            .nodes
            .get(target.node_id())
            .ok_or_else(|| GraphError::NodeNotFound(target.node_id().clone()))?;

        ConnectionValidator::validate_connection(
            &self.connections,
            &source,
            source_node.as_ref(),
            &target,
            target_node.as_ref(),
        )?;
        let value = source_node.out_data(source.index());

        debug!(
            "Connected {}:{} -> {}:{}",
            source.node_id(),
            source.index(),
            target.node_id(),
            target.index()
        );
        self.connections.add_connection(
            (source.node_id().clone(), source.index()),
            (target.node_id().clone(), target.index()),
        );

        if value.is_some() {
            if let Some(node) = self.nodes.get_mut(target.node_id()) {
                node.set_in_data(value, target.index());
            }
        }
        Ok(())
    }

    /// Remove an edge, the input receives `None`
    pub fn disconnect(&mut self, source: &OutputPort, target: &InputPort) -> Result<(), GraphError> {
        let removed = self.connections.remove_connection(
            &(source.node_id().clone(), source.index()),
            &(target.node_id().clone(), target.index()),
        );
        if !removed {
            return Err(GraphError::ConnectionNotFound);
        }

        if let Some(node) = self.nodes.get_mut(target.node_id()) {
            node.set_in_data(None, target.index());
        }
        Ok(())
    }

    /// Push the current value of an output port to every connected input
    ///
    /// Returns the number of inputs reached.
    pub fn propagate(&mut self, node_id: &NodeId, index: PortIndex) -> Result<usize, GraphError> {
        let node = self
            .nodes
            .get(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.clone()))?;
        PortValidator::validate_source_port(node_id, node.as_ref(), index)?;

        let value = node.out_data(index);
        let targets = self.connections.targets(&(node_id.clone(), index)).to_vec();
        trace!("Propagating {}:{} to {} inputs", node_id, index, targets.len());
        Ok(self.deliver(&targets, value))
    }

    fn deliver(&mut self, targets: &[PortKey], value: Option<NodeValue>) -> usize {
        let mut by_node: HashMap<NodeId, Vec<PortIndex>> = HashMap::new();
        for (target_id, index) in targets {
            by_node.entry(target_id.clone()).or_default().push(*index);
        }

        match self.config.concurrency_mode {
            ConcurrencyMode::Rayon if by_node.len() > 1 => {
                let nodes = &mut self.nodes;
                let by_node = &by_node;
                let value = &value;
                let mut fan_out = move || {
                    nodes
                        .par_iter_mut()
                        .filter(|(id, _)| by_node.contains_key(*id))
                        .for_each(|(id, node)| {
                            for &index in &by_node[id] {
                                node.set_in_data(value.clone(), index);
                            }
                        });
                };
                match &self.thread_pool {
                    Some(pool) => pool.install(fan_out),
                    None => fan_out(),
                }
            }
            _ => {
                for (target_id, index) in targets {
                    if let Some(node) = self.nodes.get_mut(target_id) {
                        node.set_in_data(value.clone(), *index);
                    }
                }
            }
        }
        targets.len()
    }

    /// Drain queued output updates and propagate each one
    ///
    /// Updates raised while propagating are handled in the same call, so a
    /// source feeding a chain settles in one drain. Returns the number of
    /// updates handled. Stops with `PropagationLimitExceeded` once
    /// `max_propagation_steps` is reached; the rest stays queued.
    pub fn process_updates(&mut self) -> Result<usize, GraphError> {
        let mut steps = 0;
        loop {
            self.backlog.extend(self.updates_rx.try_iter());
            let Some(update) = self.backlog.pop_front() else {
                break;
            };
            if steps >= self.config.max_propagation_steps {
                self.backlog.push_front(update);
                return Err(GraphError::PropagationLimitExceeded(steps));
            }
            steps += 1;

            if !self.nodes.contains_key(&update.node_id) {
                trace!("Skipping update from removed node {}", update.node_id);
                continue;
            }
            self.propagate(&update.node_id, update.index)?;
        }
        Ok(steps)
    }

    pub fn node(&self, id: &NodeId) -> Option<&dyn NodeModel> {
        self.nodes.get(id).map(|node| node.as_ref())
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Box<dyn NodeModel>> {
        self.nodes.get_mut(id)
    }

    /// Borrow a node as its concrete type
    pub fn downcast_node<T: NodeModel>(&self, id: &NodeId) -> Option<&T> {
        self.nodes.get(id)?.as_any().downcast_ref::<T>()
    }

    pub fn downcast_node_mut<T: NodeModel>(&mut self, id: &NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    pub fn has_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// All node IDs, sorted
    pub fn node_ids(&self) -> Vec<&NodeId> {
        let mut ids: Vec<&NodeId> = self.nodes.keys().collect();
        ids.sort();
        ids
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    pub fn connection_stats(&self) -> ConnectionStats {
        self.connections.stats()
    }
}

impl Default for GraphEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for GraphEngine {
    fn drop(&mut self) {
        for node in self.nodes.values_mut() {
            node.detach();
        }
    }
}
