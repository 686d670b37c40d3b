pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{DatabaseManager, StoreError};
pub use memory::{MemoryAdminRepository, MemoryRestaurantRepository};
pub use postgres::{PgAdminRepository, PgRestaurantRepository};
pub use repository::{AdminRepository, RestaurantRepository};
