use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::StoreError;
use crate::database::models::{Admin, MenuItem, Restaurant, RestaurantPatch, Review};
use crate::database::repository::{escape_like, AdminRepository, RestaurantRepository};
use crate::types::Identity;

const RESTAURANT_COLUMNS: &str = "id, owner, restaurant_name, city, country, description, \
     cuisines, menu_items, image_url, review, last_updated";

#[derive(Debug, FromRow)]
struct RestaurantRow {
    id: Uuid,
    owner: String,
    restaurant_name: String,
    city: String,
    country: String,
    description: String,
    cuisines: Json<Vec<String>>,
    menu_items: Json<Vec<MenuItem>>,
    image_url: String,
    review: Json<Vec<Review>>,
    last_updated: DateTime<Utc>,
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Self {
            id: row.id,
            owner: Identity::new(row.owner),
            restaurant_name: row.restaurant_name,
            city: row.city,
            country: row.country,
            description: row.description,
            cuisines: row.cuisines.0,
            menu_items: row.menu_items.0,
            image_url: row.image_url,
            review: row.review.0,
            last_updated: row.last_updated,
        }
    }
}

/// Restaurants stored in Postgres, sub-documents as JSONB
pub struct PgRestaurantRepository {
    pool: PgPool,
}

impl PgRestaurantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn select_many(&self, sql: &str, bind: Option<String>) -> Result<Vec<Restaurant>, StoreError> {
        let mut query = sqlx::query_as::<_, RestaurantRow>(sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Restaurant::from).collect())
    }
}

#[async_trait]
impl RestaurantRepository for PgRestaurantRepository {
    async fn find_by_owner(&self, owner: &Identity) -> Result<Option<Restaurant>, StoreError> {
        let sql = format!("SELECT {} FROM restaurants WHERE owner = $1", RESTAURANT_COLUMNS);
        let row = sqlx::query_as::<_, RestaurantRow>(&sql)
            .bind(owner.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Restaurant::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Restaurant>, StoreError> {
        let sql = format!("SELECT {} FROM restaurants WHERE id = $1", RESTAURANT_COLUMNS);
        let row = sqlx::query_as::<_, RestaurantRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Restaurant::from))
    }

    async fn find_all(&self) -> Result<Vec<Restaurant>, StoreError> {
        let sql = format!("SELECT {} FROM restaurants ORDER BY seq", RESTAURANT_COLUMNS);
        self.select_many(&sql, None).await
    }

    async fn find_by_city_contains(&self, text: &str) -> Result<Vec<Restaurant>, StoreError> {
        let sql = format!(
            "SELECT {} FROM restaurants WHERE city ILIKE '%' || $1 || '%' ESCAPE '\\' ORDER BY seq",
            RESTAURANT_COLUMNS
        );
        self.select_many(&sql, Some(escape_like(text))).await
    }

    async fn insert(&self, restaurant: Restaurant) -> Result<Restaurant, StoreError> {
        let sql = format!(
            "INSERT INTO restaurants ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {}",
            RESTAURANT_COLUMNS, RESTAURANT_COLUMNS
        );
        let owner = restaurant.owner.to_string();
        let row = sqlx::query_as::<_, RestaurantRow>(&sql)
            .bind(restaurant.id)
            .bind(restaurant.owner.as_str())
            .bind(&restaurant.restaurant_name)
            .bind(&restaurant.city)
            .bind(&restaurant.country)
            .bind(&restaurant.description)
            .bind(Json(&restaurant.cuisines))
            .bind(Json(&restaurant.menu_items))
            .bind(&restaurant.image_url)
            .bind(Json(&restaurant.review))
            .bind(restaurant.last_updated)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(e, format!("owner {} already has a restaurant", owner)))?;
        Ok(row.into())
    }

    async fn update_in_place(&self, id: Uuid, patch: RestaurantPatch) -> Result<Restaurant, StoreError> {
        let sql = format!(
            "UPDATE restaurants SET \
                restaurant_name = COALESCE($2, restaurant_name), \
                city = COALESCE($3, city), \
                country = COALESCE($4, country), \
                description = COALESCE($5, description), \
                cuisines = COALESCE($6, cuisines), \
                menu_items = COALESCE($7, menu_items), \
                review = COALESCE($8, review), \
                image_url = COALESCE($9, image_url), \
                last_updated = $10 \
             WHERE id = $1 RETURNING {}",
            RESTAURANT_COLUMNS
        );
        let row = sqlx::query_as::<_, RestaurantRow>(&sql)
            .bind(id)
            .bind(patch.restaurant_name)
            .bind(patch.city)
            .bind(patch.country)
            .bind(patch.description)
            .bind(patch.cuisines.map(Json))
            .bind(patch.menu_items.map(Json))
            .bind(patch.review.map(Json))
            .bind(patch.image_url)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Restaurant::from)
            .ok_or_else(|| StoreError::NotFound(format!("restaurant {} not found", id)))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, StoreError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, email, password_hash, created_at FROM admins WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn insert(&self, admin: Admin) -> Result<Admin, StoreError> {
        let email = admin.email.clone();
        let inserted = sqlx::query_as::<_, Admin>(
            "INSERT INTO admins (id, email, password_hash, created_at) VALUES ($1, $2, $3, $4) \
             RETURNING id, email, password_hash, created_at",
        )
        .bind(admin.id)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(admin.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(e, format!("admin {} already exists", email)))?;
        Ok(inserted)
    }
}
