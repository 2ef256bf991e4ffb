//! Dataset store implementations.

pub mod json;
pub mod memory;

pub use json::JsonDatasetStore;
pub use memory::{MemoryDatasetStore, SaveRecord};
