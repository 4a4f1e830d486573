use super::KeyValueStore;
use anyhow::{Context, Result};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "dashboard";

/// Store backed by a fjall partition under the data directory.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;
        let keyspace = Config::new(path)
            .open()
            .with_context(|| format!("Failed to open keyspace at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open dashboard partition")?;
        debug!("Opened disk store at {}", path.display());
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl KeyValueStore for DiskStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(bytes) = self.partition.get(key)? else {
            debug!("Store MISS for key: {}", key);
            return Ok(None);
        };
        debug!("Store HIT for key: {}", key);
        let value = String::from_utf8(bytes.to_vec())
            .with_context(|| format!("Stored value for {key} is not UTF-8"))?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.partition.insert(key.as_bytes(), value.as_bytes())?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store PUT for key: {}", key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.partition.remove(key.as_bytes())?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store REMOVE for key: {}", key);
        Ok(())
    }
}
