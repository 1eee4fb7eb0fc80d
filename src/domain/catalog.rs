use crate::domain::money::UnitPrice;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

/// Discriminator tag shared by orderable items and order rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Food,
    Drink,
    Room,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Food => "food",
            ItemKind::Drink => "drink",
            ItemKind::Room => "room",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    pub price: UnitPrice,
    pub hotel_id: i64,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrinkItem {
    pub id: i64,
    pub name: String,
    pub price: UnitPrice,
    pub hotel_id: i64,
    pub image_url: Option<String>,
}

/// Rooms are listed per night and carry the room type as their display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomListing {
    pub id: i64,
    pub room_type: String,
    pub price_per_night: UnitPrice,
    pub hotel_id: i64,
    pub image_url: Option<String>,
}

/// One orderable catalog entry. The three variants come from separate
/// backend tables and are tagged here so workflow logic never has to guess
/// at row shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuItem {
    Food(FoodItem),
    Drink(DrinkItem),
    Room(RoomListing),
}

impl MenuItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            MenuItem::Food(_) => ItemKind::Food,
            MenuItem::Drink(_) => ItemKind::Drink,
            MenuItem::Room(_) => ItemKind::Room,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            MenuItem::Food(item) => item.id,
            MenuItem::Drink(item) => item.id,
            MenuItem::Room(item) => item.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MenuItem::Food(item) => &item.name,
            MenuItem::Drink(item) => &item.name,
            MenuItem::Room(item) => &item.room_type,
        }
    }

    pub fn unit_price(&self) -> UnitPrice {
        match self {
            MenuItem::Food(item) => item.price,
            MenuItem::Drink(item) => item.price,
            MenuItem::Room(item) => item.price_per_night,
        }
    }

    pub fn hotel_id(&self) -> i64 {
        match self {
            MenuItem::Food(item) => item.hotel_id,
            MenuItem::Drink(item) => item.hotel_id,
            MenuItem::Room(item) => item.hotel_id,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            MenuItem::Food(item) => item.image_url.as_deref(),
            MenuItem::Drink(item) => item.image_url.as_deref(),
            MenuItem::Room(item) => item.image_url.as_deref(),
        }
    }
}
