mod common;

use async_trait::async_trait;
use common::{UnreachableProfileStore, identity, init_tracing};
use concierge::application::provisioning::ProfileProvisioner;
use concierge::domain::locale::Locale;
use concierge::domain::ports::ProfileStore;
use concierge::domain::profile::{NewProfile, Profile};
use concierge::error::{CoreError, Result};
use concierge::infrastructure::in_memory::InMemoryProfileStore;
use std::sync::Arc;
use tokio::sync::Barrier;
use uuid::Uuid;

#[tokio::test]
async fn test_creates_row_with_derived_username() {
    init_tracing();
    let store = InMemoryProfileStore::new();
    let provisioner = ProfileProvisioner::new(Box::new(store.clone()));
    let who = identity(Some("amaka@example.com"));

    provisioner.ensure_profile(Some(&who)).await.unwrap();

    let profile = store.get(who.id).await.unwrap().unwrap();
    assert_eq!(profile.id, who.id);
    assert_eq!(profile.username, "amaka");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_fallback_username_without_email() {
    let store = InMemoryProfileStore::new();
    let provisioner = ProfileProvisioner::new(Box::new(store.clone()));
    let who = identity(None);

    provisioner.ensure_profile(Some(&who)).await.unwrap();

    let profile = store.get(who.id).await.unwrap().unwrap();
    assert_eq!(
        profile.username,
        format!("user_{}", &who.id.to_string()[..6])
    );
}

#[tokio::test]
async fn test_existing_profile_is_left_alone() {
    let store = InMemoryProfileStore::new();
    let who = identity(Some("amaka@example.com"));
    store
        .insert(NewProfile {
            id: who.id,
            username: "handpicked".to_string(),
        })
        .await
        .unwrap();

    let provisioner = ProfileProvisioner::new(Box::new(store.clone()));
    provisioner.ensure_profile(Some(&who)).await.unwrap();

    let profile = store.get(who.id).await.unwrap().unwrap();
    assert_eq!(profile.username, "handpicked");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_lookup_failure_is_not_masked_as_absent() {
    let store = UnreachableProfileStore::new();
    let provisioner = ProfileProvisioner::new(Box::new(store.clone()));
    let who = identity(Some("amaka@example.com"));

    let result = provisioner.ensure_profile(Some(&who)).await;
    match result {
        Err(CoreError::Transport(message)) => {
            assert_eq!(message, "connection reset by peer");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
    assert_eq!(store.insert_attempts(), 0);
}

/// Holds every caller at the barrier after its existence check, so both
/// racers observe "no profile" before either inserts.
#[derive(Clone)]
struct RacingProfileStore {
    inner: InMemoryProfileStore,
    barrier: Arc<Barrier>,
}

#[async_trait]
impl ProfileStore for RacingProfileStore {
    async fn get(&self, id: Uuid) -> Result<Option<Profile>> {
        let row = self.inner.get(id).await?;
        self.barrier.wait().await;
        Ok(row)
    }

    async fn insert(&self, profile: NewProfile) -> Result<()> {
        self.inner.insert(profile).await
    }

    async fn update_username(&self, id: Uuid, username: &str) -> Result<()> {
        self.inner.update_username(id, username).await
    }

    async fn upsert_locale(&self, id: Uuid, locale: &Locale) -> Result<()> {
        self.inner.upsert_locale(id, locale).await
    }

    async fn update_avatar(&self, id: Uuid, url: &str) -> Result<()> {
        self.inner.update_avatar(id, url).await
    }
}

#[tokio::test]
async fn test_concurrent_provisioning_creates_exactly_one_row() {
    init_tracing();
    let inner = InMemoryProfileStore::new();
    let barrier = Arc::new(Barrier::new(2));
    let who = identity(Some("amaka@example.com"));

    let mut handles = Vec::new();
    for _ in 0..2 {
        let store = RacingProfileStore {
            inner: inner.clone(),
            barrier: barrier.clone(),
        };
        let who = who.clone();
        handles.push(tokio::spawn(async move {
            let provisioner = ProfileProvisioner::new(Box::new(store));
            provisioner.ensure_profile(Some(&who)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(inner.len().await, 1);
    let profile = inner.get(who.id).await.unwrap().unwrap();
    assert_eq!(profile.username, "amaka");
}
