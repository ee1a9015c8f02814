use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Data type tag carried by every port and every value travelling on a port
///
/// Two tags are compatible when their `id`s are equal; `name` is the
/// human-readable label shown next to the port.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct DataType {
    pub id: Cow<'static, str>,
    pub name: Cow<'static, str>,
}

impl DataType {
    /// Build a tag at compile time
    pub const fn new(id: &'static str, name: &'static str) -> Self {
        Self {
            id: Cow::Borrowed(id),
            name: Cow::Borrowed(name),
        }
    }

    /// Build a tag from runtime strings
    pub fn owned(id: &str, name: &str) -> Self {
        Self {
            id: Cow::Owned(id.to_string()),
            name: Cow::Owned(name.to_string()),
        }
    }

    /// Check if a value of `other` may be delivered to a port of this type
    pub fn accepts(&self, other: &DataType) -> bool {
        self.id == other.id
    }
}

impl PartialEq for DataType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl std::hash::Hash for DataType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One CAN bus frame
pub const CAN_FRAME: DataType = DataType::new("canframe", "CanFrame");

/// Opaque byte buffer
pub const GENERIC_BLOB: DataType = DataType::new("blob", "GenericBlob");

/// Types that travel on ports declare their tag here
pub trait NodeData: Send + Sync + 'static {
    fn data_type() -> DataType
    where
        Self: Sized;
}

impl NodeData for crate::core::frame::CanFrame {
    fn data_type() -> DataType {
        CAN_FRAME
    }
}

/// Raw bytes with no protocol meaning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericBlob(pub Vec<u8>);

impl NodeData for GenericBlob {
    fn data_type() -> DataType {
        GENERIC_BLOB
    }
}
