pub mod bridge;
pub mod components;
pub mod connections;
pub mod error;
pub mod execution;
pub mod frame;
pub mod nodes;
pub mod signals;
pub mod types;
pub mod values;

#[cfg(test)]
mod tests;
