pub mod admin;
pub mod restaurant;

pub use admin::Admin;
pub use restaurant::{MenuItem, Restaurant, RestaurantPatch, Review};
