use async_trait::async_trait;
use concierge::domain::catalog::ItemKind;
use concierge::domain::draft::ItemSelection;
use concierge::domain::identity::Identity;
use concierge::domain::order::{NewOrder, Order};
use concierge::domain::ports::{OrderStore, ProfileStore};
use concierge::domain::profile::{NewProfile, Profile};
use concierge::error::{CoreError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn identity(email: Option<&str>) -> Identity {
    Identity::new(Uuid::new_v4(), email.map(str::to_string))
}

pub fn food_selection(unit_price: Decimal) -> ItemSelection {
    ItemSelection {
        item_id: 42,
        item_type: ItemKind::Food,
        item_name: "Jollof Rice".to_string(),
        unit_price: unit_price.try_into().unwrap(),
        image_url: None,
        hotel_id: 7,
        hotel_name: Some("Eko Hotel".to_string()),
    }
}

/// An order store whose writes always fail with a backend-provided
/// message.
pub struct FailingOrderStore {
    pub message: String,
}

impl FailingOrderStore {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    fn error(&self) -> CoreError {
        CoreError::Transport(self.message.clone())
    }
}

#[async_trait]
impl OrderStore for FailingOrderStore {
    async fn insert(&self, _order: NewOrder) -> Result<Order> {
        Err(self.error())
    }

    async fn list_for_customer(&self, _customer_id: Uuid) -> Result<Vec<Order>> {
        Err(self.error())
    }

    async fn cancel_pending(&self, _id: Uuid, _customer_id: Uuid) -> Result<bool> {
        Err(self.error())
    }
}

/// A profile store whose reads fail; counts insert attempts so tests can
/// assert nothing was written after a failed lookup.
#[derive(Clone, Default)]
pub struct UnreachableProfileStore {
    inserts: Arc<AtomicUsize>,
}

impl UnreachableProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_attempts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileStore for UnreachableProfileStore {
    async fn get(&self, _id: Uuid) -> Result<Option<Profile>> {
        Err(CoreError::Transport(
            "connection reset by peer".to_string(),
        ))
    }

    async fn insert(&self, _profile: NewProfile) -> Result<()> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update_username(&self, _id: Uuid, _username: &str) -> Result<()> {
        Ok(())
    }

    async fn upsert_locale(
        &self,
        _id: Uuid,
        _locale: &concierge::domain::locale::Locale,
    ) -> Result<()> {
        Ok(())
    }

    async fn update_avatar(&self, _id: Uuid, _url: &str) -> Result<()> {
        Ok(())
    }
}
