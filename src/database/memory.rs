use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::StoreError;
use crate::database::models::{Admin, Restaurant, RestaurantPatch};
use crate::database::repository::{AdminRepository, RestaurantRepository};
use crate::types::Identity;

/// In-process restaurant store for local runs and tests.
///
/// A `Vec` keeps insertion order; the owner check and the push share one
/// write lock, which plays the role of the unique index.
#[derive(Default)]
pub struct MemoryRestaurantRepository {
    restaurants: RwLock<Vec<Restaurant>>,
}

impl MemoryRestaurantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.restaurants.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RestaurantRepository for MemoryRestaurantRepository {
    async fn find_by_owner(&self, owner: &Identity) -> Result<Option<Restaurant>, StoreError> {
        let restaurants = self.restaurants.read().await;
        Ok(restaurants.iter().find(|r| &r.owner == owner).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Restaurant>, StoreError> {
        let restaurants = self.restaurants.read().await;
        Ok(restaurants.iter().find(|r| r.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Restaurant>, StoreError> {
        Ok(self.restaurants.read().await.clone())
    }

    async fn find_by_city_contains(&self, text: &str) -> Result<Vec<Restaurant>, StoreError> {
        let needle = text.to_lowercase();
        let restaurants = self.restaurants.read().await;
        Ok(restaurants
            .iter()
            .filter(|r| r.city.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn insert(&self, restaurant: Restaurant) -> Result<Restaurant, StoreError> {
        let mut restaurants = self.restaurants.write().await;
        if restaurants.iter().any(|r| r.owner == restaurant.owner) {
            return Err(StoreError::Conflict(format!(
                "owner {} already has a restaurant",
                restaurant.owner
            )));
        }
        restaurants.push(restaurant.clone());
        Ok(restaurant)
    }

    async fn update_in_place(&self, id: Uuid, patch: RestaurantPatch) -> Result<Restaurant, StoreError> {
        let mut restaurants = self.restaurants.write().await;
        let restaurant = restaurants
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("restaurant {} not found", id)))?;
        restaurant.apply(patch, Utc::now());
        Ok(restaurant.clone())
    }
}

#[derive(Default)]
pub struct MemoryAdminRepository {
    admins: RwLock<Vec<Admin>>,
}

impl MemoryAdminRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminRepository for MemoryAdminRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, StoreError> {
        let admins = self.admins.read().await;
        Ok(admins.iter().find(|a| a.email == email).cloned())
    }

    async fn insert(&self, admin: Admin) -> Result<Admin, StoreError> {
        let mut admins = self.admins.write().await;
        if admins.iter().any(|a| a.email == admin.email) {
            return Err(StoreError::Conflict(format!("admin {} already exists", admin.email)));
        }
        admins.push(admin.clone());
        Ok(admin)
    }
}
