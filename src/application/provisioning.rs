use crate::domain::identity::Identity;
use crate::domain::ports::ProfileStoreBox;
use crate::domain::profile::{NewProfile, default_username};
use crate::error::{CoreError, Result};
use tracing::{debug, error, info};

/// Ensures exactly one profile row exists for the authenticated identity.
///
/// Safe to call repeatedly and concurrently: a screen remount can race a
/// prior in-flight check, and the losing insert collapses to success.
pub struct ProfileProvisioner {
    profiles: ProfileStoreBox,
}

impl ProfileProvisioner {
    pub fn new(profiles: ProfileStoreBox) -> Self {
        Self { profiles }
    }

    /// One read, at most one write. Absence of a profile is a branch, not
    /// an error; any other fetch failure propagates without masking it as
    /// "absent".
    pub async fn ensure_profile(&self, identity: Option<&Identity>) -> Result<()> {
        let Some(identity) = identity else {
            debug!("no identity present, skipping profile check");
            return Ok(());
        };

        let existing = match self.profiles.get(identity.id).await {
            Ok(row) => row,
            Err(e) => {
                error!(user = %identity.id, error = %e, "profile lookup failed");
                return Err(e);
            }
        };
        if existing.is_some() {
            debug!(user = %identity.id, "profile already exists");
            return Ok(());
        }

        let username = default_username(identity);
        match self
            .profiles
            .insert(NewProfile {
                id: identity.id,
                username: username.clone(),
            })
            .await
        {
            Ok(()) => {
                info!(user = %identity.id, %username, "profile created");
                Ok(())
            }
            // Lost the race against a concurrent check; the row exists.
            Err(CoreError::Conflict(_)) => {
                debug!(user = %identity.id, "profile was created concurrently");
                Ok(())
            }
            Err(e) => {
                error!(user = %identity.id, error = %e, "profile creation failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ProfileStore;
    use crate::infrastructure::in_memory::InMemoryProfileStore;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_creates_profile_once() {
        let store = InMemoryProfileStore::new();
        let provisioner = ProfileProvisioner::new(Box::new(store.clone()));
        let identity = Identity::new(Uuid::new_v4(), Some("amaka@example.com".to_string()));

        provisioner
            .ensure_profile(Some(&identity))
            .await
            .unwrap();
        provisioner
            .ensure_profile(Some(&identity))
            .await
            .unwrap();

        let profile = store.get(identity.id).await.unwrap().unwrap();
        assert_eq!(profile.username, "amaka");
    }

    #[tokio::test]
    async fn test_unauthenticated_is_a_noop() {
        let store = InMemoryProfileStore::new();
        let provisioner = ProfileProvisioner::new(Box::new(store.clone()));

        provisioner.ensure_profile(None).await.unwrap();
        assert!(store.is_empty().await);
    }

    /// Reports every profile as absent so the insert path runs even when
    /// the row already exists, like a check that lost the race.
    #[derive(Clone)]
    struct StaleReadStore {
        inner: InMemoryProfileStore,
    }

    #[async_trait::async_trait]
    impl ProfileStore for StaleReadStore {
        async fn get(&self, _id: Uuid) -> Result<Option<crate::domain::profile::Profile>> {
            Ok(None)
        }

        async fn insert(&self, profile: NewProfile) -> Result<()> {
            self.inner.insert(profile).await
        }

        async fn update_username(&self, id: Uuid, username: &str) -> Result<()> {
            self.inner.update_username(id, username).await
        }

        async fn upsert_locale(
            &self,
            id: Uuid,
            locale: &crate::domain::locale::Locale,
        ) -> Result<()> {
            self.inner.upsert_locale(id, locale).await
        }

        async fn update_avatar(&self, id: Uuid, url: &str) -> Result<()> {
            self.inner.update_avatar(id, url).await
        }
    }

    #[tokio::test]
    async fn test_conflict_collapses_to_success() {
        let inner = InMemoryProfileStore::new();
        let store = StaleReadStore {
            inner: inner.clone(),
        };
        let identity = Identity::new(Uuid::new_v4(), None);

        let provisioner = ProfileProvisioner::new(Box::new(store.clone()));
        provisioner
            .ensure_profile(Some(&identity))
            .await
            .unwrap();
        // Second call re-runs the insert against the existing row and the
        // conflict collapses to success.
        provisioner
            .ensure_profile(Some(&identity))
            .await
            .unwrap();

        assert_eq!(inner.len().await, 1);
    }
}
