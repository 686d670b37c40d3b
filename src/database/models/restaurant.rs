use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Identity;

/// One restaurant document per owner, with embedded menu and review entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "user")]
    pub owner: Identity,
    pub restaurant_name: String,
    pub city: String,
    pub country: String,
    pub description: String,
    pub cuisines: Vec<String>,
    pub menu_items: Vec<MenuItem>,
    pub image_url: String,
    pub review: Vec<Review>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub rating: u8,
    pub about: String,
}

/// Partial update: only `Some` fields are written, everything else is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantPatch {
    pub restaurant_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub cuisines: Option<Vec<String>>,
    pub menu_items: Option<Vec<MenuItem>>,
    pub review: Option<Vec<Review>>,
    pub image_url: Option<String>,
}

impl Restaurant {
    /// Merge a patch into this document and stamp `last_updated`.
    pub fn apply(&mut self, patch: RestaurantPatch, now: DateTime<Utc>) {
        if let Some(v) = patch.restaurant_name {
            self.restaurant_name = v;
        }
        if let Some(v) = patch.city {
            self.city = v;
        }
        if let Some(v) = patch.country {
            self.country = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.cuisines {
            self.cuisines = v;
        }
        if let Some(v) = patch.menu_items {
            self.menu_items = v;
        }
        if let Some(v) = patch.review {
            self.review = v;
        }
        if let Some(v) = patch.image_url {
            self.image_url = v;
        }
        self.last_updated = now;
    }
}
