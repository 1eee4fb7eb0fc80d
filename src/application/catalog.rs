use crate::domain::catalog::{Hotel, MenuItem};
use crate::domain::ports::CatalogStoreBox;
use crate::error::Result;
use tracing::debug;

/// Read-only catalog browsing: hotels and their orderable items.
pub struct CatalogService {
    catalog: CatalogStoreBox,
}

impl CatalogService {
    pub fn new(catalog: CatalogStoreBox) -> Self {
        Self { catalog }
    }

    pub async fn hotels(&self) -> Result<Vec<Hotel>> {
        let hotels = self.catalog.hotels().await?;
        debug!(count = hotels.len(), "fetched hotels");
        Ok(hotels)
    }

    /// Food, drinks and rooms for one hotel, merged into a single list.
    pub async fn menu(&self, hotel_id: i64) -> Result<Vec<MenuItem>> {
        let items = self.catalog.menu(hotel_id).await?;
        debug!(hotel = hotel_id, count = items.len(), "fetched menu");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{DrinkItem, FoodItem, ItemKind};
    use crate::infrastructure::in_memory::InMemoryCatalogStore;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_menu_only_lists_the_requested_hotel() {
        let store = InMemoryCatalogStore::new();
        store
            .seed_item(MenuItem::Food(FoodItem {
                id: 1,
                name: "Jollof Rice".to_string(),
                price: dec!(10.00).try_into().unwrap(),
                hotel_id: 7,
                image_url: None,
            }))
            .await;
        store
            .seed_item(MenuItem::Drink(DrinkItem {
                id: 2,
                name: "Chapman".to_string(),
                price: dec!(3.50).try_into().unwrap(),
                hotel_id: 8,
                image_url: None,
            }))
            .await;

        let service = CatalogService::new(Box::new(store));
        let menu = service.menu(7).await.unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].kind(), ItemKind::Food);
        assert_eq!(menu[0].name(), "Jollof Rice");
    }
}
