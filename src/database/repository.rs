use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::StoreError;
use crate::database::models::{Admin, Restaurant, RestaurantPatch};
use crate::types::Identity;

/// Document-store contract for restaurants.
///
/// Reads are returned in insertion order. Implementations must enforce the
/// one-restaurant-per-owner rule themselves: `insert` fails with
/// `StoreError::Conflict` when the owner already has a document, even when two
/// inserts for the same owner race.
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn find_by_owner(&self, owner: &Identity) -> Result<Option<Restaurant>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Restaurant>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Restaurant>, StoreError>;

    /// Case-insensitive substring match on `city`.
    async fn find_by_city_contains(&self, text: &str) -> Result<Vec<Restaurant>, StoreError>;

    async fn insert(&self, restaurant: Restaurant) -> Result<Restaurant, StoreError>;

    /// Write only the supplied fields and refresh `last_updated`.
    async fn update_in_place(&self, id: Uuid, patch: RestaurantPatch) -> Result<Restaurant, StoreError>;

    /// Connectivity check used by `/health`
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, StoreError>;

    /// Fails with `StoreError::Conflict` when the email is taken.
    async fn insert(&self, admin: Admin) -> Result<Admin, StoreError>;
}

/// Escape `%`, `_` and `\` so user text is matched literally inside ILIKE.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
