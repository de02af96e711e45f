use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::contract::{Info, NewInfo};

use super::cache::KeyValueStore;
use super::error::DomainError;
use super::repo::InfoRepository;
use super::upstream::UpstreamPort;

pub const DEFAULT_GREETING: &str = "Hello, clean-reactive!";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub greeting: String,
    pub max_name_length: usize,
    pub cache_key: String,
    pub cache_ttl: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_owned(),
            max_name_length: 255,
            cache_key: "upstream:content".to_owned(),
            cache_ttl: Duration::from_secs(10),
        }
    }
}

/// Pass-through service over the repository, the key-value store and the
/// upstream source.
pub struct InfoService {
    repo: Arc<dyn InfoRepository>,
    store: Arc<dyn KeyValueStore>,
    upstream: Arc<dyn UpstreamPort>,
    config: ServiceConfig,
}

impl InfoService {
    #[must_use]
    pub fn new(
        repo: Arc<dyn InfoRepository>,
        store: Arc<dyn KeyValueStore>,
        upstream: Arc<dyn UpstreamPort>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            store,
            upstream,
            config,
        }
    }

    #[must_use]
    pub fn greeting(&self) -> &str {
        &self.config.greeting
    }

    /// # Errors
    /// `DomainError::Database` if the repository fails
    #[instrument(skip(self))]
    pub async fn get_all_info(&self) -> Result<Vec<Info>, DomainError> {
        let infos = self.repo.find_all().await?;
        debug!(count = infos.len(), "listed infos");
        Ok(infos)
    }

    /// # Errors
    /// `DomainError::NotFound` when no row has this id
    #[instrument(skip(self), fields(info_id = id))]
    pub async fn get_info(&self, id: i64) -> Result<Info, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(id))
    }

    /// # Errors
    /// `DomainError::Database` if the repository fails
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Info>, DomainError> {
        Ok(self.repo.find_by_name(name).await?)
    }

    /// # Errors
    /// `DomainError::Validation` when the name is longer than the configured limit
    #[instrument(skip(self, new), fields(info_id = ?new.id))]
    pub async fn save_info(&self, new: NewInfo) -> Result<Info, DomainError> {
        self.validate_name(&new.name)?;
        let saved = self.repo.save(new).await?;
        debug!(info_id = saved.id, "saved info");
        Ok(saved)
    }

    /// # Errors
    /// `DomainError::NotFound` when no row has this id
    #[instrument(skip(self), fields(info_id = id))]
    pub async fn delete_info(&self, id: i64) -> Result<(), DomainError> {
        if self.repo.delete_by_id(id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found(id))
        }
    }

    /// # Errors
    /// `DomainError::Database` if the repository fails
    pub async fn count_info(&self) -> Result<u64, DomainError> {
        Ok(self.repo.count().await?)
    }

    /// Cache-aside read of the upstream content.
    ///
    /// A hit returns the stored value. A miss fetches upstream, stores the
    /// result for the configured TTL and returns it. Concurrent misses each
    /// go upstream.
    ///
    /// # Errors
    /// `DomainError::Cache` or `DomainError::Upstream`
    #[instrument(skip(self), fields(cache_key = %self.config.cache_key))]
    pub async fn get_cached_upstream(&self) -> Result<String, DomainError> {
        let key = self.config.cache_key.as_str();

        if let Some(hit) = self.store.get(key).await.map_err(DomainError::Cache)? {
            debug!("cache hit");
            return Ok(hit);
        }

        debug!("cache miss, fetching upstream");
        let fresh = self
            .upstream
            .fetch_text()
            .await
            .map_err(DomainError::Upstream)?;

        self.store
            .set_with_ttl(key, fresh.clone(), self.config.cache_ttl)
            .await
            .map_err(DomainError::Cache)?;

        Ok(fresh)
    }

    fn validate_name(&self, name: &str) -> Result<(), DomainError> {
        if name.chars().count() > self.config.max_name_length {
            return Err(DomainError::validation(
                "name",
                format!("exceeds maximum length of {}", self.config.max_name_length),
            ));
        }
        Ok(())
    }
}
