use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Restaurant, RestaurantPatch};
use crate::database::{RestaurantRepository, StoreError};
use crate::error::FieldErrors;
use crate::services::input::{assign_menu_ids, assign_review_ids, Mode, RestaurantForm};
use crate::types::Identity;
use crate::upload::{ImageUpload, UploadError, UploadGateway};

#[derive(Debug, Error)]
pub enum RestaurantError {
    #[error("Invalid restaurant data: {0:?}")]
    Validation(FieldErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Store(StoreError),
}

impl RestaurantError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), message.into());
        RestaurantError::Validation(errors)
    }
}

impl From<StoreError> for RestaurantError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => RestaurantError::Conflict(msg),
            StoreError::NotFound(msg) => RestaurantError::NotFound(msg),
            other => RestaurantError::Store(other),
        }
    }
}

/// Create, read and update the caller's own restaurant.
#[derive(Clone)]
pub struct RestaurantManager {
    repo: Arc<dyn RestaurantRepository>,
    uploads: UploadGateway,
}

impl RestaurantManager {
    pub fn new(repo: Arc<dyn RestaurantRepository>, uploads: UploadGateway) -> Self {
        Self { repo, uploads }
    }

    /// `Absent -> Present`. The image is mandatory here. An owner that
    /// already has a restaurant gets `Conflict` whatever the payload.
    pub async fn create_my_restaurant(
        &self,
        owner: &Identity,
        image: Option<ImageUpload>,
        form: RestaurantForm,
    ) -> Result<Restaurant, RestaurantError> {
        // A duplicate create never uploads; the store's unique owner
        // constraint still decides races.
        if self.repo.find_by_owner(owner).await?.is_some() {
            return Err(RestaurantError::Conflict(format!(
                "owner {} already has a restaurant; use update instead",
                owner
            )));
        }

        let (fields, image) = match (form.validate(Mode::Create), image) {
            (Ok(fields), Some(image)) => (fields, image),
            (result, image) => {
                let mut errors = result.err().unwrap_or_default();
                if image.is_none() {
                    errors.insert(
                        "imageFile".to_string(),
                        "an image is required when creating a restaurant".to_string(),
                    );
                }
                return Err(RestaurantError::Validation(errors));
            }
        };

        let image_url = self.uploads.upload(&image).await?;

        let restaurant = Restaurant {
            id: Uuid::new_v4(),
            owner: owner.clone(),
            restaurant_name: fields.restaurant_name.unwrap_or_default(),
            city: fields.city.unwrap_or_default(),
            country: fields.country.unwrap_or_default(),
            description: fields.description.unwrap_or_default(),
            cuisines: fields.cuisines.unwrap_or_default(),
            menu_items: assign_menu_ids(fields.menu_items.unwrap_or_default(), &[]),
            image_url: image_url.clone(),
            review: assign_review_ids(fields.review.unwrap_or_default(), &[]),
            last_updated: Utc::now(),
        };

        match self.repo.insert(restaurant).await {
            Ok(created) => {
                tracing::info!(owner = %owner, restaurant_id = %created.id, "Restaurant created");
                Ok(created)
            }
            Err(e) => {
                tracing::warn!(owner = %owner, url = %image_url, error = %e, "Insert failed after upload; blob orphaned");
                Err(e.into())
            }
        }
    }

    pub async fn get_my_restaurant(&self, owner: &Identity) -> Result<Restaurant, RestaurantError> {
        self.repo
            .find_by_owner(owner)
            .await?
            .ok_or_else(|| RestaurantError::NotFound("restaurant not found".to_string()))
    }

    /// Merge only the supplied fields; a new image replaces `imageUrl`,
    /// otherwise the stored one is kept.
    pub async fn update_my_restaurant(
        &self,
        owner: &Identity,
        image: Option<ImageUpload>,
        form: RestaurantForm,
    ) -> Result<Restaurant, RestaurantError> {
        let fields = form
            .validate(Mode::Update)
            .map_err(RestaurantError::Validation)?;

        if let Some(image) = &image {
            self.uploads.check(image)?;
        }

        let existing = self.get_my_restaurant(owner).await?;

        let image_url = match &image {
            Some(image) => Some(self.uploads.upload(image).await?),
            None => None,
        };

        let patch = RestaurantPatch {
            restaurant_name: fields.restaurant_name,
            city: fields.city,
            country: fields.country,
            description: fields.description,
            cuisines: fields.cuisines,
            menu_items: fields
                .menu_items
                .map(|drafts| assign_menu_ids(drafts, &existing.menu_items)),
            review: fields
                .review
                .map(|drafts| assign_review_ids(drafts, &existing.review)),
            image_url: image_url.clone(),
        };

        match self.repo.update_in_place(existing.id, patch).await {
            Ok(updated) => {
                tracing::info!(owner = %owner, restaurant_id = %updated.id, "Restaurant updated");
                Ok(updated)
            }
            Err(e) => {
                if let Some(url) = image_url {
                    tracing::warn!(owner = %owner, url = %url, error = %e, "Update failed after upload; blob orphaned");
                }
                Err(e.into())
            }
        }
    }
}
