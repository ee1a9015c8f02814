pub mod connection_validator;
pub mod manager;
pub mod port_validator;

pub use connection_validator::ConnectionValidator;
pub use manager::{ConnectionManager, ConnectionStats, PortKey};
pub use port_validator::PortValidator;
