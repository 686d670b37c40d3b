// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Anonymous restaurant browsing plus the owner signup and login endpoints
// that hand out bearer tokens for the protected tier.

pub mod admin;
pub mod restaurants;

pub use admin::{login as admin_login, signup as admin_signup};
pub use restaurants::{get as restaurant_get, list as restaurant_list, search as restaurant_search};
