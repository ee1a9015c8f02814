pub mod config;
pub mod graph_engine;

// Re-export commonly used types
pub use config::{ConcurrencyMode, EngineConfig};
pub use graph_engine::GraphEngine;
