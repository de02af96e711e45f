use async_trait::async_trait;
use std::time::Duration;

/// String key/value store with per-entry expiry
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `None` when the key is absent or expired
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Write `value`; it expires `ttl` after this call
    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> anyhow::Result<()>;

    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
