use crate::domain::catalog::{DrinkItem, FoodItem, Hotel, MenuItem, RoomListing};
use crate::domain::locale::Locale;
use crate::domain::money::UnitPrice;
use crate::domain::order::{NewOrder, Order};
use crate::domain::ports::{CatalogStore, ObjectStore, OrderStore, ProfileStore};
use crate::domain::profile::{NewProfile, Profile};
use crate::error::{CoreError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

/// Postgres unique-constraint violation, surfaced by the backend's REST
/// layer on duplicate inserts.
const UNIQUE_VIOLATION: &str = "23505";

/// Connection settings for the hosted backend: one fixed URL and the
/// publishable key.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub anon_key: String,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// Reads `BACKEND_URL` and `BACKEND_ANON_KEY`, loading a `.env` file
    /// first if one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("BACKEND_URL")
            .map_err(|_| CoreError::Config("BACKEND_URL is not set".to_string()))?;
        let anon_key = std::env::var("BACKEND_ANON_KEY")
            .map_err(|_| CoreError::Config("BACKEND_ANON_KEY is not set".to_string()))?;
        Ok(Self::new(base_url, anon_key))
    }
}

/// HTTP client for the hosted backend's REST and storage interfaces.
///
/// `Clone` shares the underlying connection pool: construct one at process
/// start and hand boxed clones to each service. The backend enforces row
/// ownership; this client only shapes requests and validates rows on the
/// way in.
#[derive(Clone)]
pub struct RemoteBackend {
    client: Client,
    config: RemoteConfig,
}

#[derive(Debug, Deserialize, Default)]
struct BackendErrorBody {
    message: Option<String>,
    code: Option<String>,
}

impl RemoteBackend {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, table)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .json::<BackendErrorBody>()
            .await
            .unwrap_or_default();
        let message = body
            .message
            .unwrap_or_else(|| format!("backend returned {status}"));
        if status == StatusCode::CONFLICT || body.code.as_deref() == Some(UNIQUE_VIOLATION) {
            Err(CoreError::Conflict(message))
        } else {
            Err(CoreError::Transport(message))
        }
    }

    async fn select_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        debug!(table, "select");
        let response = self
            .authed(self.client.get(self.rest_url(table)).query(query))
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn patch_rows(
        &self,
        table: &str,
        query: &[(&str, String)],
        patch: serde_json::Value,
    ) -> Result<reqwest::Response> {
        debug!(table, "update");
        let response = self
            .authed(self.client.patch(self.rest_url(table)).query(query))
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?;
        Self::check(response).await
    }
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: Uuid,
    username: Option<String>,
    country: Option<String>,
    currency: Option<String>,
    avatar_url: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            username: row.username.unwrap_or_default(),
            country: row.country,
            currency: row.currency,
            avatar_url: row.avatar_url,
        }
    }
}

#[async_trait]
impl ProfileStore for RemoteBackend {
    async fn get(&self, id: Uuid) -> Result<Option<Profile>> {
        let rows: Vec<ProfileRow> = self
            .select_rows(
                "profile",
                &[
                    ("select", "id,username,country,currency,avatar_url".to_string()),
                    ("id", format!("eq.{id}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next().map(Into::into))
    }

    async fn insert(&self, profile: NewProfile) -> Result<()> {
        let response = self
            .authed(self.client.post(self.rest_url("profile")))
            .header("Prefer", "return=minimal")
            .json(&profile)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn update_username(&self, id: Uuid, username: &str) -> Result<()> {
        self.patch_rows(
            "profile",
            &[("id", format!("eq.{id}"))],
            json!({ "username": username }),
        )
        .await?;
        Ok(())
    }

    async fn upsert_locale(&self, id: Uuid, locale: &Locale) -> Result<()> {
        let response = self
            .authed(self.client.post(self.rest_url("profile")))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&json!({
                "id": id,
                "country": locale.country,
                "currency": locale.currency,
            }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn update_avatar(&self, id: Uuid, url: &str) -> Result<()> {
        self.patch_rows(
            "profile",
            &[("id", format!("eq.{id}"))],
            json!({ "avatar_url": url }),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for RemoteBackend {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        let response = self
            .authed(self.client.post(self.rest_url("orders")))
            .header("Prefer", "return=representation")
            .json(&order)
            .send()
            .await?;
        let response = Self::check(response).await?;
        let rows: Vec<Order> = response.json().await?;
        rows.into_iter().next().ok_or_else(|| {
            CoreError::Transport("backend returned no row for the inserted order".to_string())
        })
    }

    async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<Order>> {
        self.select_rows(
            "orders",
            &[
                (
                    "select",
                    "id,customer_id,hotel_id,item_id,item_type,quantity,total_price,status,payment_method,created_at"
                        .to_string(),
                ),
                ("customer_id", format!("eq.{customer_id}")),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    async fn cancel_pending(&self, id: Uuid, customer_id: Uuid) -> Result<bool> {
        let response = self
            .patch_rows(
                "orders",
                &[
                    ("id", format!("eq.{id}")),
                    ("customer_id", format!("eq.{customer_id}")),
                    ("status", "eq.pending".to_string()),
                ],
                json!({ "status": "cancelled" }),
            )
            .await?;
        let rows: Vec<serde_json::Value> = response.json().await?;
        Ok(!rows.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct FoodRow {
    id: i64,
    name: String,
    price: Decimal,
    hotel_id: i64,
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RoomRow {
    id: i64,
    room_type: String,
    price_per_night: Decimal,
    hotel_id: i64,
    image_url: Option<String>,
}

fn catalog_price(table: &str, id: i64, value: Decimal) -> Result<UnitPrice> {
    UnitPrice::new(value)
        .map_err(|_| CoreError::Transport(format!("{table} row {id} carries an invalid price")))
}

#[async_trait]
impl CatalogStore for RemoteBackend {
    async fn hotels(&self) -> Result<Vec<Hotel>> {
        self.select_rows(
            "hotels",
            &[("select", "id,name,location,image_url".to_string())],
        )
        .await
    }

    async fn menu(&self, hotel_id: i64) -> Result<Vec<MenuItem>> {
        let filter = [("hotel_id", format!("eq.{hotel_id}"))];
        let food_query = [
            ("select", "id,name,price,hotel_id,image_url".to_string()),
            filter[0].clone(),
        ];
        let room_query = [
            (
                "select",
                "id,room_type,price_per_night,hotel_id,image_url".to_string(),
            ),
            filter[0].clone(),
        ];

        let (food, drinks, rooms) = tokio::try_join!(
            self.select_rows::<FoodRow>("food", &food_query),
            self.select_rows::<FoodRow>("drinks", &food_query),
            self.select_rows::<RoomRow>("rooms", &room_query),
        )?;

        let mut items = Vec::with_capacity(food.len() + drinks.len() + rooms.len());
        for row in food {
            items.push(MenuItem::Food(FoodItem {
                id: row.id,
                name: row.name,
                price: catalog_price("food", row.id, row.price)?,
                hotel_id: row.hotel_id,
                image_url: row.image_url,
            }));
        }
        for row in drinks {
            items.push(MenuItem::Drink(DrinkItem {
                id: row.id,
                name: row.name,
                price: catalog_price("drinks", row.id, row.price)?,
                hotel_id: row.hotel_id,
                image_url: row.image_url,
            }));
        }
        for row in rooms {
            items.push(MenuItem::Room(RoomListing {
                id: row.id,
                room_type: row.room_type,
                price_per_night: catalog_price("rooms", row.id, row.price_per_night)?,
                hotel_id: row.hotel_id,
                image_url: row.image_url,
            }));
        }
        Ok(items)
    }
}

#[async_trait]
impl ObjectStore for RemoteBackend {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.config.base_url, bucket, path
        );
        let response = self
            .authed(self.client.post(url))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.base_url, bucket, path
        ))
    }
}
