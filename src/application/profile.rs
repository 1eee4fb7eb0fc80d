use crate::domain::identity::Identity;
use crate::domain::locale::Locale;
use crate::domain::ports::{ObjectStoreBox, ProfileStoreBox};
use crate::domain::profile::Profile;
use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

pub const AVATAR_BUCKET: &str = "avatars";

/// Profile reads and mutations for the signed-in customer.
pub struct ProfileService {
    profiles: ProfileStoreBox,
    objects: ObjectStoreBox,
}

impl ProfileService {
    pub fn new(profiles: ProfileStoreBox, objects: ObjectStoreBox) -> Self {
        Self { profiles, objects }
    }

    /// An absent row is not an error; the caller shows its own empty
    /// state or triggers provisioning.
    pub async fn fetch(&self, identity: &Identity) -> Result<Option<Profile>> {
        self.profiles.get(identity.id).await
    }

    pub async fn change_username(&self, identity: &Identity, new_username: &str) -> Result<()> {
        let name = new_username.trim();
        if name.is_empty() {
            return Err(CoreError::Validation(
                "username cannot be empty".to_string(),
            ));
        }
        if name.chars().count() < 3 {
            return Err(CoreError::Validation(
                "username must be at least 3 characters long".to_string(),
            ));
        }
        self.profiles.update_username(identity.id, name).await?;
        info!(user = %identity.id, username = %name, "username updated");
        Ok(())
    }

    /// Sign-in hook: records the device region's country and currency
    /// against the profile.
    pub async fn record_locale(&self, identity: &Identity, region: &str) -> Result<()> {
        let locale = Locale::from_region(region);
        self.profiles.upsert_locale(identity.id, &locale).await?;
        info!(user = %identity.id, country = %locale.country, currency = %locale.currency, "locale recorded");
        Ok(())
    }

    /// Uploads an avatar under `{userId}_{timestamp}.{ext}` and writes the
    /// resulting public URL back to the profile.
    pub async fn upload_avatar(
        &self,
        identity: &Identity,
        bytes: Vec<u8>,
        ext: &str,
        content_type: &str,
    ) -> Result<String> {
        let path = avatar_path(identity.id, ext, Utc::now());
        let url = self
            .objects
            .upload(AVATAR_BUCKET, &path, bytes, content_type)
            .await?;
        self.profiles.update_avatar(identity.id, &url).await?;
        info!(user = %identity.id, %url, "avatar uploaded");
        Ok(url)
    }
}

fn avatar_path(user_id: Uuid, ext: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}.{}", user_id, at.timestamp_millis(), ext)
}
