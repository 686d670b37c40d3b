// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) and protected (bearer token). Multipart decoding shared
// by the protected write handlers lives in `form`.

pub mod form;
pub mod protected;
pub mod public;
