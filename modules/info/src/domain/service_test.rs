use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::cache::KeyValueStore;
use super::error::DomainError;
use super::repo::InfoRepository;
use super::service::{InfoService, ServiceConfig};
use super::upstream::UpstreamPort;
use crate::contract::{Info, NewInfo};

struct MockRepository {
    rows: Mutex<Vec<Info>>,
}

impl MockRepository {
    fn with_rows(rows: Vec<Info>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
        })
    }
}

#[async_trait]
impl InfoRepository for MockRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<Info>> {
        Ok(self.rows.lock().clone())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Info>> {
        Ok(self.rows.lock().iter().find(|i| i.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Vec<Info>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|i| i.name == name)
            .cloned()
            .collect())
    }

    async fn save(&self, info: NewInfo) -> anyhow::Result<Info> {
        let saved = Info::new(info.id.unwrap_or(100), info.name);
        self.rows.lock().push(saved.clone());
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|i| i.id != id);
        Ok(rows.len() != before)
    }

    async fn count(&self) -> anyhow::Result<u64> {
        Ok(self.rows.lock().len() as u64)
    }
}

struct FailingRepository;

#[async_trait]
impl InfoRepository for FailingRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<Info>> {
        anyhow::bail!("connection refused")
    }

    async fn find_by_id(&self, _id: i64) -> anyhow::Result<Option<Info>> {
        anyhow::bail!("connection refused")
    }

    async fn find_by_name(&self, _name: &str) -> anyhow::Result<Vec<Info>> {
        anyhow::bail!("connection refused")
    }

    async fn save(&self, _info: NewInfo) -> anyhow::Result<Info> {
        anyhow::bail!("connection refused")
    }

    async fn delete_by_id(&self, _id: i64) -> anyhow::Result<bool> {
        anyhow::bail!("connection refused")
    }

    async fn count(&self) -> anyhow::Result<u64> {
        anyhow::bail!("connection refused")
    }
}

/// Remembers values and the TTL they were written with; never expires
#[derive(Default)]
struct MapStore {
    entries: Mutex<HashMap<String, (String, Duration)>>,
}

#[async_trait]
impl KeyValueStore for MapStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.lock().get(key).map(|(v, _)| v.clone()))
    }

    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> anyhow::Result<()> {
        self.entries.lock().insert(key.to_owned(), (value, ttl));
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

struct CountingUpstream {
    body: &'static str,
    calls: AtomicUsize,
    fail: bool,
}

impl CountingUpstream {
    fn ok(body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            body,
            calls: AtomicUsize::new(0),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            body: "",
            calls: AtomicUsize::new(0),
            fail: true,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamPort for CountingUpstream {
    async fn fetch_text(&self) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("upstream returned 503");
        }
        Ok(self.body.to_owned())
    }
}

fn service_with(
    repo: Arc<dyn InfoRepository>,
    store: Arc<dyn KeyValueStore>,
    upstream: Arc<dyn UpstreamPort>,
) -> InfoService {
    InfoService::new(repo, store, upstream, ServiceConfig::default())
}

fn seeded_service() -> InfoService {
    service_with(
        MockRepository::with_rows(vec![Info::new(1, "first"), Info::new(2, "second")]),
        Arc::new(MapStore::default()),
        CountingUpstream::ok("upstream"),
    )
}

#[test]
fn greeting_defaults_and_overrides() {
    assert_eq!(seeded_service().greeting(), "Hello, clean-reactive!");

    let config = ServiceConfig {
        greeting: "hi".to_owned(),
        ..ServiceConfig::default()
    };
    let service = InfoService::new(
        MockRepository::with_rows(vec![]),
        Arc::new(MapStore::default()),
        CountingUpstream::ok(""),
        config,
    );
    assert_eq!(service.greeting(), "hi");
}

#[tokio::test]
async fn get_all_info_passes_through() {
    let infos = seeded_service().get_all_info().await.unwrap();
    assert_eq!(infos, vec![Info::new(1, "first"), Info::new(2, "second")]);
}

#[tokio::test]
async fn get_info_found_and_missing() {
    let service = seeded_service();
    assert_eq!(service.get_info(2).await.unwrap(), Info::new(2, "second"));

    let err = service.get_info(42).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { id: 42 }));
}

#[tokio::test]
async fn find_by_name_filters() {
    let found = seeded_service().find_by_name("first").await.unwrap();
    assert_eq!(found, vec![Info::new(1, "first")]);
}

#[tokio::test]
async fn save_info_rejects_long_names() {
    let config = ServiceConfig {
        max_name_length: 3,
        ..ServiceConfig::default()
    };
    let repo = MockRepository::with_rows(vec![]);
    let service = InfoService::new(
        repo.clone(),
        Arc::new(MapStore::default()),
        CountingUpstream::ok(""),
        config,
    );

    let err = service.save_info(NewInfo::named("four")).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "name"));
    assert_eq!(repo.count().await.unwrap(), 0);

    let saved = service.save_info(NewInfo::named("abc")).await.unwrap();
    assert_eq!(saved.name, "abc");
}

#[tokio::test]
async fn delete_info_reports_missing_rows() {
    let service = seeded_service();
    service.delete_info(1).await.unwrap();
    assert_eq!(service.count_info().await.unwrap(), 1);

    let err = service.delete_info(1).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { id: 1 }));
}

#[tokio::test]
async fn repository_failures_become_database_errors() {
    let service = service_with(
        Arc::new(FailingRepository),
        Arc::new(MapStore::default()),
        CountingUpstream::ok(""),
    );
    assert!(matches!(
        service.get_all_info().await.unwrap_err(),
        DomainError::Database(_)
    ));
    assert!(matches!(
        service.get_info(1).await.unwrap_err(),
        DomainError::Database(_)
    ));
}

#[tokio::test]
async fn cache_aside_miss_then_hit() {
    let store = Arc::new(MapStore::default());
    let upstream = CountingUpstream::ok("<html>upstream</html>");
    let service = service_with(
        MockRepository::with_rows(vec![]),
        store.clone(),
        upstream.clone(),
    );

    let first = service.get_cached_upstream().await.unwrap();
    let second = service.get_cached_upstream().await.unwrap();

    assert_eq!(first, "<html>upstream</html>");
    assert_eq!(second, first);
    assert_eq!(upstream.calls(), 1);

    let entries = store.entries.lock();
    let (value, ttl) = entries.get("upstream:content").unwrap();
    assert_eq!(value, "<html>upstream</html>");
    assert_eq!(*ttl, Duration::from_secs(10));
}

#[tokio::test]
async fn cache_aside_serves_existing_entry_without_upstream() {
    let store = Arc::new(MapStore::default());
    store
        .set_with_ttl("upstream:content", "cached".to_owned(), Duration::from_secs(10))
        .await
        .unwrap();
    let upstream = CountingUpstream::ok("fresh");
    let service = service_with(MockRepository::with_rows(vec![]), store, upstream.clone());

    assert_eq!(service.get_cached_upstream().await.unwrap(), "cached");
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn cache_aside_upstream_failure_is_not_cached() {
    let store = Arc::new(MapStore::default());
    let upstream = CountingUpstream::failing();
    let service = service_with(
        MockRepository::with_rows(vec![]),
        store.clone(),
        upstream.clone(),
    );

    let err = service.get_cached_upstream().await.unwrap_err();
    assert!(matches!(err, DomainError::Upstream(_)));
    assert!(store.get("upstream:content").await.unwrap().is_none());

    assert!(service.get_cached_upstream().await.is_err());
    assert_eq!(upstream.calls(), 2);
}
