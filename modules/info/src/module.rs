//! Builds the info service and its router from configuration.

use std::sync::Arc;

use axum::Router;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::rest::routes;
use crate::config::{InfoConfig, StorageKind};
use crate::contract::NewInfo;
use crate::domain::cache::KeyValueStore;
use crate::domain::repo::InfoRepository;
use crate::domain::service::InfoService;
use crate::domain::upstream::UpstreamPort;
use crate::infra::cache::MokaStore;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{InMemoryInfoRepository, SeaOrmInfoRepository};
use crate::infra::upstream::HttpUpstream;

/// The wired service plus the settings the router needs
pub struct InfoModule {
    service: Arc<InfoService>,
    config: InfoConfig,
}

impl InfoModule {
    /// Connect storage, run migrations, seed an empty store and build the
    /// upstream client. Must run inside a tokio runtime.
    ///
    /// # Errors
    /// Fails on invalid configuration, an unreachable database or a failed
    /// migration
    pub async fn init(config: InfoConfig) -> anyhow::Result<Self> {
        config.validate()?;
        info!(
            storage = ?config.storage,
            root_mode = ?config.root_mode,
            "Initializing info module"
        );

        let repo = build_repository(&config).await?;
        let store: Arc<dyn KeyValueStore> = Arc::new(MokaStore::new(config.cache.max_entries));
        let upstream: Arc<dyn UpstreamPort> = Arc::new(HttpUpstream::new(
            config.upstream.url.as_str(),
            config.upstream.timeout,
        )?);

        let module = Self::with_parts(repo, store, upstream, config);
        module.seed().await?;

        info!("Info module initialized");
        Ok(module)
    }

    /// Assemble from ready-made ports, skipping storage setup
    #[must_use]
    pub fn with_parts(
        repo: Arc<dyn InfoRepository>,
        store: Arc<dyn KeyValueStore>,
        upstream: Arc<dyn UpstreamPort>,
        config: InfoConfig,
    ) -> Self {
        let service = Arc::new(InfoService::new(
            repo,
            store,
            upstream,
            config.service_config(),
        ));
        Self { service, config }
    }

    #[must_use]
    pub fn service(&self) -> Arc<InfoService> {
        Arc::clone(&self.service)
    }

    #[must_use]
    pub fn router(&self) -> Router {
        routes::router(self.service(), self.config.root_mode)
    }

    async fn seed(&self) -> anyhow::Result<()> {
        if self.config.seed.is_empty() || self.service.count_info().await? > 0 {
            return Ok(());
        }
        for info in &self.config.seed {
            self.service
                .save_info(NewInfo::with_id(info.id, info.name.clone()))
                .await?;
        }
        info!(rows = self.config.seed.len(), "Seeded info store");
        Ok(())
    }
}

async fn build_repository(config: &InfoConfig) -> anyhow::Result<Arc<dyn InfoRepository>> {
    match config.storage {
        StorageKind::Memory => Ok(Arc::new(InMemoryInfoRepository::new())),
        StorageKind::Relational => {
            let mut options = ConnectOptions::new(config.database.dsn.as_str());
            options.sqlx_logging(false);
            if config.database.dsn.contains(":memory:") {
                // every pooled connection would open its own empty database
                options.max_connections(1);
            }
            let conn = Database::connect(options).await?;

            info!("Running info database migrations");
            Migrator::up(&conn, None).await?;

            Ok(Arc::new(SeaOrmInfoRepository::new(conn)))
        }
    }
}
