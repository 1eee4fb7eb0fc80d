use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated principal issued by the backend's auth subsystem.
///
/// Identities are created on sign-up and only ever read by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: Uuid, email: Option<String>) -> Self {
        Self { id, email }
    }
}
