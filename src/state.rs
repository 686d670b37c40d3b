use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::database::{AdminRepository, RestaurantRepository};
use crate::services::{AdminService, RestaurantManager, RestaurantSearch};
use crate::upload::{BlobStore, UploadGateway};

/// Services shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub manager: RestaurantManager,
    pub search: RestaurantSearch,
    pub admins: AdminService,
    pub tokens: TokenKeys,
    restaurants: Arc<dyn RestaurantRepository>,
}

impl AppState {
    /// Wire the services over one restaurant store, one admin store and one blob store.
    pub fn new(
        restaurants: Arc<dyn RestaurantRepository>,
        admins: Arc<dyn AdminRepository>,
        blobs: Arc<dyn BlobStore>,
        tokens: TokenKeys,
        config: &AppConfig,
    ) -> Self {
        let uploads = UploadGateway::new(blobs, &config.upload);

        Self {
            manager: RestaurantManager::new(restaurants.clone(), uploads),
            search: RestaurantSearch::new(restaurants.clone()),
            admins: AdminService::new(admins, tokens.clone()),
            tokens,
            restaurants,
        }
    }

    pub fn restaurants(&self) -> &Arc<dyn RestaurantRepository> {
        &self.restaurants
    }
}
