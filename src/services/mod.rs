pub mod admin_service;
pub mod input;
pub mod restaurant_manager;
pub mod restaurant_search;

pub use admin_service::{AdminError, AdminService, Credentials, Session};
pub use input::{MenuItemInput, RestaurantForm, ReviewInput};
pub use restaurant_manager::{RestaurantError, RestaurantManager};
pub use restaurant_search::RestaurantSearch;
