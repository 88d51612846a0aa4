//! Market Intel Storage
//!
//! Storage implementations for the market intelligence engine.

pub mod memory_store;
pub mod traits;

pub use memory_store::MemoryStore;
pub use traits::Storage;
