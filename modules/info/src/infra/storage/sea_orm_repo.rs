//! `SeaORM` repository implementation for `Info`.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Statement,
};
use tracing::instrument;

use super::entity::{self, Entity as InfoEntity};
use super::mapper::new_info_to_active_model;
use crate::contract::{Info, NewInfo};
use crate::domain::repo::InfoRepository;

pub struct SeaOrmInfoRepository {
    conn: DatabaseConnection,
}

impl SeaOrmInfoRepository {
    #[must_use]
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserting an explicit id bypasses the Postgres identity sequence;
    /// move it past the current maximum so store-assigned ids keep working.
    async fn sync_id_sequence(&self) -> anyhow::Result<()> {
        if let Some(stmt) = id_sequence_sync(self.conn.get_database_backend()) {
            self.conn.execute(stmt).await?;
        }
        Ok(())
    }
}

/// Statement realigning the `info.id` sequence, for backends that keep one
/// apart from the table.
fn id_sequence_sync(backend: DbBackend) -> Option<Statement> {
    (backend == DbBackend::Postgres).then(|| {
        Statement::from_string(
            backend,
            "SELECT setval(pg_get_serial_sequence('info', 'id'), (SELECT MAX(id) FROM info))",
        )
    })
}

#[async_trait]
impl InfoRepository for SeaOrmInfoRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<Info>> {
        let rows = InfoEntity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Info>> {
        let row = InfoEntity::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Vec<Info>> {
        let rows = InfoEntity::find()
            .filter(entity::Column::Name.eq(name))
            .order_by_asc(entity::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, info), fields(info_id = ?info.id))]
    async fn save(&self, info: NewInfo) -> anyhow::Result<Info> {
        let existing = match info.id {
            Some(id) => InfoEntity::find_by_id(id).one(&self.conn).await?,
            None => None,
        };

        let explicit_id = info.id.is_some();
        let model = if let Some(existing) = existing {
            let mut active: entity::ActiveModel = existing.into();
            active.name = ActiveValue::Set(info.name);
            active.update(&self.conn).await?
        } else {
            let model = new_info_to_active_model(info).insert(&self.conn).await?;
            if explicit_id {
                self.sync_id_sequence().await?;
            }
            model
        };

        Ok(model.into())
    }

    #[instrument(skip(self), fields(info_id = id))]
    async fn delete_by_id(&self, id: i64) -> anyhow::Result<bool> {
        let result = InfoEntity::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> anyhow::Result<u64> {
        Ok(InfoEntity::find().count(&self.conn).await?)
    }
}
