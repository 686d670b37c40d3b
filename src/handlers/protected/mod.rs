// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here sits behind `jwt_auth_middleware`, so handlers can take
// `Extension<AuthUser>` and act on the caller's own restaurant only.

pub mod manage;

pub use manage::get as manage_get;
pub use manage::post as manage_post;
pub use manage::put as manage_put;
