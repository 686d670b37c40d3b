use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::Restaurant;
use crate::database::RestaurantRepository;
use crate::services::RestaurantError;

/// Anonymous read side: lookup by id, full listing and city search.
#[derive(Clone)]
pub struct RestaurantSearch {
    repo: Arc<dyn RestaurantRepository>,
}

impl RestaurantSearch {
    pub fn new(repo: Arc<dyn RestaurantRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_restaurant(&self, restaurant_id: &str) -> Result<Restaurant, RestaurantError> {
        let restaurant_id = restaurant_id.trim();
        if restaurant_id.is_empty() {
            return Err(RestaurantError::field("restaurantId", "restaurantId is required"));
        }

        // Ids are UUIDs; anything else cannot name a stored restaurant
        let not_found = || RestaurantError::NotFound(format!("restaurant '{}' not found", restaurant_id));
        let id = Uuid::parse_str(restaurant_id).map_err(|_| not_found())?;

        self.repo.find_by_id(id).await?.ok_or_else(not_found)
    }

    pub async fn get_all_restaurants(&self) -> Result<Vec<Restaurant>, RestaurantError> {
        Ok(self.repo.find_all().await?)
    }

    /// Case-insensitive substring match on `city`. An empty result is not an error.
    pub async fn search_restaurants(&self, city: &str) -> Result<Vec<Restaurant>, RestaurantError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(RestaurantError::field("city", "city is required"));
        }

        let found = self.repo.find_by_city_contains(city).await?;
        tracing::debug!(city = %city, count = found.len(), "City search");
        Ok(found)
    }
}
