//! Synchronous key-value persistence for dashboard state.

pub mod disk;
pub mod memory;

use anyhow::Result;

pub use disk::DiskStore;
pub use memory::MemoryStore;

/// A string key-value store, read and written synchronously.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
