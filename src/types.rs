/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque owner identifier bound to a verified bearer token.
///
/// Used as the ownership key of a restaurant document; at most one
/// restaurant exists per identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<uuid::Uuid> for Identity {
    fn from(id: uuid::Uuid) -> Self {
        Self(id.to_string())
    }
}
