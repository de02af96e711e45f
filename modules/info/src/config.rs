use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::contract::Info;
use crate::domain::service::{DEFAULT_GREETING, ServiceConfig};

/// What `GET /` answers with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootMode {
    #[default]
    Greeting,
    Infos,
    Upstream,
}

/// Backend behind the `InfoRepository` port
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Memory,
    Relational,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InfoConfig {
    pub root_mode: RootMode,
    pub storage: StorageKind,
    pub greeting: String,
    pub max_name_length: usize,
    /// Rows inserted at startup when the store is empty
    pub seed: Vec<Info>,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub upstream: UpstreamConfig,
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            root_mode: RootMode::default(),
            storage: StorageKind::default(),
            greeting: DEFAULT_GREETING.to_owned(),
            max_name_length: default_max_name_length(),
            seed: Vec::new(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            upstream: UpstreamConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub dsn: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite::memory:".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub key: String,
    #[serde(with = "crate::humantime_serde")]
    pub ttl: Duration,
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key: "upstream:content".to_owned(),
            ttl: default_cache_ttl(),
            max_entries: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamConfig {
    pub url: String,
    #[serde(with = "crate::humantime_serde")]
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "https://www.example.com/".to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

fn default_max_name_length() -> usize {
    255
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(10)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid info.{field}: {message}")]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl InfoConfig {
    /// # Errors
    /// Returns the first setting that cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_name_length == 0 {
            return Err(ConfigError::new("max_name_length", "must be positive"));
        }
        if self.cache.key.is_empty() {
            return Err(ConfigError::new("cache.key", "must not be empty"));
        }
        if self.cache.ttl.is_zero() {
            return Err(ConfigError::new("cache.ttl", "must be positive"));
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::new("cache.max_entries", "must be positive"));
        }
        if !(self.upstream.url.starts_with("http://") || self.upstream.url.starts_with("https://"))
        {
            return Err(ConfigError::new(
                "upstream.url",
                format!("'{}' is not an http(s) URL", self.upstream.url),
            ));
        }
        if self.storage == StorageKind::Relational && self.database.dsn.is_empty() {
            return Err(ConfigError::new("database.dsn", "required for relational storage"));
        }
        if let Some(info) = self
            .seed
            .iter()
            .find(|info| info.name.chars().count() > self.max_name_length)
        {
            return Err(ConfigError::new(
                "seed",
                format!("name of info {} exceeds max_name_length", info.id),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            greeting: self.greeting.clone(),
            max_name_length: self.max_name_length,
            cache_key: self.cache.key.clone(),
            cache_ttl: self.cache.ttl,
        }
    }
}
