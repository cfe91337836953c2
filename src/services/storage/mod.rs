pub mod memory;
pub mod sqlite;

/// Client-local key/value persistence.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn clear(&self, key: &str) -> anyhow::Result<()>;
}
