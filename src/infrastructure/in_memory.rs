use crate::domain::catalog::{Hotel, MenuItem};
use crate::domain::checkout::{CheckoutOutcome, PreparedCheckout};
use crate::domain::identity::Identity;
use crate::domain::locale::Locale;
use crate::domain::order::{NewOrder, Order, OrderStatus};
use crate::domain::ports::{
    AuthGateway, CatalogStore, ObjectStore, OrderStore, PaymentGateway, ProfileStore,
};
use crate::domain::profile::{NewProfile, Profile};
use crate::error::{CoreError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory profile table.
///
/// Uses `Arc<RwLock<HashMap>>` for shared concurrent access; `Clone` shares
/// the underlying map, so tests can keep a handle next to the boxed copy a
/// service owns.
#[derive(Default, Clone)]
pub struct InMemoryProfileStore {
    rows: Arc<RwLock<HashMap<Uuid, Profile>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, id: Uuid) -> Result<Option<Profile>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).cloned())
    }

    async fn insert(&self, profile: NewProfile) -> Result<()> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&profile.id) {
            return Err(CoreError::Conflict(format!(
                "profile {} already exists",
                profile.id
            )));
        }
        rows.insert(
            profile.id,
            Profile {
                id: profile.id,
                username: profile.username,
                country: None,
                currency: None,
                avatar_url: None,
            },
        );
        Ok(())
    }

    async fn update_username(&self, id: Uuid, username: &str) -> Result<()> {
        let mut rows = self.rows.write().await;
        if let Some(profile) = rows.get_mut(&id) {
            profile.username = username.to_string();
        }
        Ok(())
    }

    async fn upsert_locale(&self, id: Uuid, locale: &Locale) -> Result<()> {
        let mut rows = self.rows.write().await;
        let profile = rows.entry(id).or_insert_with(|| Profile {
            id,
            username: String::new(),
            country: None,
            currency: None,
            avatar_url: None,
        });
        profile.country = Some(locale.country.clone());
        profile.currency = Some(locale.currency.clone());
        Ok(())
    }

    async fn update_avatar(&self, id: Uuid, url: &str) -> Result<()> {
        let mut rows = self.rows.write().await;
        if let Some(profile) = rows.get_mut(&id) {
            profile.avatar_url = Some(url.to_string());
        }
        Ok(())
    }
}

/// A thread-safe in-memory orders table. Assigns ids and timestamps the
/// way the backend would.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    rows: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        let placed = Order {
            id: Uuid::new_v4(),
            customer_id: order.customer_id,
            hotel_id: order.hotel_id,
            item_id: order.item_id,
            item_type: order.item_type,
            quantity: order.quantity,
            total_price: order.total_price,
            status: order.status,
            payment_method: order.payment_method,
            created_at: Utc::now(),
        };
        self.rows.write().await.push(placed.clone());
        Ok(placed)
    }

    async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<Order>> {
        let rows = self.rows.read().await;
        // Appended in chronological order, so newest first is a reverse
        // scan.
        Ok(rows
            .iter()
            .rev()
            .filter(|order| order.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn cancel_pending(&self, id: Uuid, customer_id: Uuid) -> Result<bool> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|order| {
            order.id == id
                && order.customer_id == customer_id
                && order.status == OrderStatus::Pending
        }) {
            Some(order) => {
                order.status = OrderStatus::Cancelled;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// A seeded, read-only in-memory catalog.
#[derive(Default, Clone)]
pub struct InMemoryCatalogStore {
    hotels: Arc<RwLock<Vec<Hotel>>>,
    items: Arc<RwLock<Vec<MenuItem>>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_hotel(&self, hotel: Hotel) {
        self.hotels.write().await.push(hotel);
    }

    pub async fn seed_item(&self, item: MenuItem) {
        self.items.write().await.push(item);
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn hotels(&self) -> Result<Vec<Hotel>> {
        Ok(self.hotels.read().await.clone())
    }

    async fn menu(&self, hotel_id: i64) -> Result<Vec<MenuItem>> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|item| item.hotel_id() == hotel_id)
            .cloned()
            .collect())
    }
}

/// In-memory object storage with fabricated public URLs.
#[derive(Default, Clone)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, bucket: &str, path: &str) -> bool {
        self.objects
            .read()
            .await
            .contains_key(&format!("{bucket}/{path}"))
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String> {
        let key = format!("{bucket}/{path}");
        self.objects.write().await.insert(key.clone(), bytes);
        Ok(format!("memory://{key}"))
    }
}

/// A payment gateway that returns a scripted outcome and records every
/// request it saw.
#[derive(Clone)]
pub struct StubPaymentGateway {
    outcome: Arc<RwLock<CheckoutOutcome>>,
    requests: Arc<RwLock<Vec<PreparedCheckout>>>,
}

impl StubPaymentGateway {
    pub fn new(outcome: CheckoutOutcome) -> Self {
        Self {
            outcome: Arc::new(RwLock::new(outcome)),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn set_outcome(&self, outcome: CheckoutOutcome) {
        *self.outcome.write().await = outcome;
    }

    pub async fn requests(&self) -> Vec<PreparedCheckout> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl PaymentGateway for StubPaymentGateway {
    async fn checkout(&self, request: PreparedCheckout) -> Result<CheckoutOutcome> {
        self.requests.write().await.push(request);
        Ok(self.outcome.read().await.clone())
    }
}

/// An auth gateway pinned to a fixed identity.
#[derive(Default, Clone)]
pub struct StaticAuthGateway {
    identity: Arc<std::sync::RwLock<Option<Identity>>>,
}

impl StaticAuthGateway {
    pub fn new(identity: Option<Identity>) -> Self {
        Self {
            identity: Arc::new(std::sync::RwLock::new(identity)),
        }
    }

    pub fn set(&self, identity: Option<Identity>) {
        if let Ok(mut current) = self.identity.write() {
            *current = identity;
        }
    }
}

#[async_trait]
impl AuthGateway for StaticAuthGateway {
    async fn current_identity(&self) -> Result<Option<Identity>> {
        Ok(self
            .identity
            .read()
            .map_err(|_| CoreError::Transport("auth state poisoned".to_string()))?
            .clone())
    }
}
