use async_trait::async_trait;
use parking_lot::RwLock;

use crate::contract::{Info, NewInfo};
use crate::domain::repo::InfoRepository;

/// Process-local list of `Info`, kept in insertion order.
#[derive(Default)]
pub struct InMemoryInfoRepository {
    rows: RwLock<Vec<Info>>,
}

impl InMemoryInfoRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from `seed`; a later row with a repeated id replaces the earlier one
    #[must_use]
    pub fn with_seed(seed: impl IntoIterator<Item = Info>) -> Self {
        let mut rows: Vec<Info> = Vec::new();
        for info in seed {
            match rows.iter_mut().find(|row| row.id == info.id) {
                Some(row) => row.name = info.name,
                None => rows.push(info),
            }
        }
        Self {
            rows: RwLock::new(rows),
        }
    }
}

#[async_trait]
impl InfoRepository for InMemoryInfoRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<Info>> {
        Ok(self.rows.read().clone())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Info>> {
        Ok(self.rows.read().iter().find(|row| row.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Vec<Info>> {
        Ok(self
            .rows
            .read()
            .iter()
            .filter(|row| row.name == name)
            .cloned()
            .collect())
    }

    async fn save(&self, info: NewInfo) -> anyhow::Result<Info> {
        let mut rows = self.rows.write();

        let id = match info.id {
            Some(id) => id,
            None => next_id(&rows)?,
        };

        let saved = Info::new(id, info.name);
        match rows.iter_mut().find(|row| row.id == id) {
            Some(row) => row.name.clone_from(&saved.name),
            None => rows.push(saved.clone()),
        }
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> anyhow::Result<bool> {
        let mut rows = self.rows.write();
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok(rows.len() != before)
    }

    async fn count(&self) -> anyhow::Result<u64> {
        Ok(self.rows.read().len() as u64)
    }
}

fn next_id(rows: &[Info]) -> anyhow::Result<i64> {
    rows.iter()
        .map(|row| row.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| anyhow::anyhow!("id space exhausted"))
}
