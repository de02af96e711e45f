use async_trait::async_trait;

/// Source of the content served by the cache-aside read
#[async_trait]
pub trait UpstreamPort: Send + Sync {
    async fn fetch_text(&self) -> anyhow::Result<String>;
}
