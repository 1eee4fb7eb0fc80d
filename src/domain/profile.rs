use crate::domain::identity::Identity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Application-level user record, keyed by identity id. At most one row
/// exists per identity; [`crate::application::provisioning`] creates it
/// lazily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub avatar_url: Option<String>,
}

/// Insert payload for a freshly provisioned profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub id: Uuid,
    pub username: String,
}

/// Local part of the email, or `user_` plus the first 6 characters of the
/// identity id when no usable email exists.
pub fn default_username(identity: &Identity) -> String {
    identity
        .email
        .as_deref()
        .and_then(|email| email.split('@').next())
        .filter(|local| !local.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("user_{}", &identity.id.to_string()[..6]))
}
