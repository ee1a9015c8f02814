use crate::core::components::traits::NodeModel;
use crate::core::error::GraphError;
use crate::core::nodes::{CanFrameSource, CanRawView, FrameFilter};
use crate::core::values::data_type::{DataType, CAN_FRAME, GENERIC_BLOB};
use std::collections::HashMap;

/// Creates a fresh node instance
pub type NodeFactory = fn() -> Box<dyn NodeModel>;

/// Known port data types, keyed by tag id
#[derive(Debug, Clone)]
pub struct DataTypeRegistry {
    types: HashMap<String, DataType>,
}

impl DataTypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Registry holding the built-in CanFrame and GenericBlob types
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(CAN_FRAME);
        registry.register(GENERIC_BLOB);
        registry
    }

    /// Register a data type, returns false if the id was already known
    pub fn register(&mut self, data_type: DataType) -> bool {
        let id = data_type.id.to_string();
        if self.types.contains_key(&id) {
            return false;
        }
        self.types.insert(id, data_type);
        true
    }

    pub fn get(&self, id: &str) -> Option<&DataType> {
        self.types.get(id)
    }

    pub fn contains(&self, data_type: &DataType) -> bool {
        self.types.contains_key(data_type.id.as_ref())
    }

    /// All registered types, sorted by id
    pub fn data_types(&self) -> Vec<&DataType> {
        let mut types: Vec<&DataType> = self.types.values().collect();
        types.sort_by(|a, b| a.id.cmp(&b.id));
        types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for DataTypeRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

/// Manages the node kinds a graph can instantiate by name
#[derive(Clone)]
pub struct NodeRegistry {
    factories: HashMap<String, NodeFactory>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with the CAN node kinds shipped in this crate
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        let builtin: [(&str, NodeFactory); 3] = [
            (CanRawView::NAME, || Box::new(CanRawView::new()) as Box<dyn NodeModel>),
            (CanFrameSource::NAME, || Box::new(CanFrameSource::new()) as Box<dyn NodeModel>),
            (FrameFilter::NAME, || Box::new(FrameFilter::pass_all()) as Box<dyn NodeModel>),
        ];
        for (name, factory) in builtin {
            registry.factories.insert(name.to_string(), factory);
        }
        registry
    }

    /// Register a node kind
    pub fn register(&mut self, name: &str, factory: NodeFactory) -> Result<(), GraphError> {
        if self.factories.contains_key(name) {
            return Err(GraphError::DuplicateNodeType(name.to_string()));
        }
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    /// Instantiate a node kind by name
    pub fn create(&self, name: &str) -> Result<Box<dyn NodeModel>, GraphError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| GraphError::UnknownNodeType(name.to_string()))
    }

    pub fn has_node_type(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn node_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort();
        names
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}
