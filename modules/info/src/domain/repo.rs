use async_trait::async_trait;

use crate::contract::{Info, NewInfo};

#[async_trait]
pub trait InfoRepository: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<Info>>;

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Info>>;

    /// Exact match on `name`
    async fn find_by_name(&self, name: &str) -> anyhow::Result<Vec<Info>>;

    /// Insert or update, see [`NewInfo`]
    async fn save(&self, info: NewInfo) -> anyhow::Result<Info>;

    /// Returns whether a row was removed
    async fn delete_by_id(&self, id: i64) -> anyhow::Result<bool>;

    async fn count(&self) -> anyhow::Result<u64>;
}
