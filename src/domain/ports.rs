use crate::domain::catalog::{Hotel, MenuItem};
use crate::domain::checkout::{CheckoutOutcome, PreparedCheckout};
use crate::domain::identity::Identity;
use crate::domain::locale::Locale;
use crate::domain::order::{NewOrder, Order};
use crate::domain::profile::{NewProfile, Profile};
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Pure transport over the remote `profile` table. No business rules live
/// behind these methods.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Profile>>;
    /// Fails with `CoreError::Conflict` when a row with the same id
    /// already exists.
    async fn insert(&self, profile: NewProfile) -> Result<()>;
    async fn update_username(&self, id: Uuid, username: &str) -> Result<()>;
    async fn upsert_locale(&self, id: Uuid, locale: &Locale) -> Result<()>;
    async fn update_avatar(&self, id: Uuid, url: &str) -> Result<()>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: NewOrder) -> Result<Order>;
    /// Newest first.
    async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<Order>>;
    /// Sets the order to cancelled only while it is still pending. Returns
    /// false when no matching pending order exists.
    async fn cancel_pending(&self, id: Uuid, customer_id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn hotels(&self) -> Result<Vec<Hotel>>;
    async fn menu(&self, hotel_id: i64) -> Result<Vec<MenuItem>>;
}

/// File storage for avatar images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads and returns the public URL of the stored object.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String>;
}

/// Handoff to the external checkout popup. The popup's UI lifecycle is
/// owned by the processor, not by this crate.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn checkout(&self, request: PreparedCheckout) -> Result<CheckoutOutcome>;
}

/// The backend's auth subsystem, read-only from here.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn current_identity(&self) -> Result<Option<Identity>>;
}

pub type ProfileStoreBox = Box<dyn ProfileStore>;
pub type OrderStoreBox = Box<dyn OrderStore>;
pub type CatalogStoreBox = Box<dyn CatalogStore>;
pub type ObjectStoreBox = Box<dyn ObjectStore>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type AuthGatewayBox = Box<dyn AuthGateway>;
