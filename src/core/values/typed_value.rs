use super::data_type::{DataType, NodeData};
use std::any::{Any, TypeId};
use std::sync::Arc;

/// Type-erased but type-tagged container for port values
///
/// The payload sits behind an `Arc`, so cloning a value for fan-out shares
/// the payload instead of copying it. Payloads are never mutated once
/// wrapped.
#[derive(Clone)]
pub struct NodeValue {
    data: Arc<dyn Any + Send + Sync>,
    data_type: DataType,
    type_name: &'static str,
    type_id: TypeId,
}

impl NodeValue {
    /// Wrap a payload under its own data type tag
    pub fn new<T: NodeData>(value: T) -> Self {
        Self::tagged(T::data_type(), value)
    }

    /// Wrap a payload under an explicit tag
    pub fn tagged<T: Send + Sync + 'static>(data_type: DataType, value: T) -> Self {
        Self {
            data: Arc::new(value),
            data_type,
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    /// Get the data type tag
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Get a reference to the contained value
    pub fn get<T: 'static>(&self) -> Result<&T, String> {
        if TypeId::of::<T>() != self.type_id {
            return Err(format!(
                "Type mismatch: expected {}, found {}",
                std::any::type_name::<T>(),
                self.type_name
            ));
        }

        self.data
            .downcast_ref::<T>()
            .ok_or_else(|| format!("Failed to downcast to {}", std::any::type_name::<T>()))
    }

    /// Get the Rust type name of the contained value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check if the contained value is of type T
    pub fn is_type<T: 'static>(&self) -> bool {
        TypeId::of::<T>() == self.type_id
    }

    /// Check if two values share the same payload allocation
    pub fn ptr_eq(&self, other: &NodeValue) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl std::fmt::Debug for NodeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeValue")
            .field("data_type", &self.data_type.id)
            .field("type_name", &self.type_name)
            .finish()
    }
}
