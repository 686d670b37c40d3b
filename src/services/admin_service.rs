use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{AuthError, TokenKeys};
use crate::database::models::Admin;
use crate::database::{AdminRepository, StoreError};
use crate::error::FieldErrors;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Invalid credentials payload: {0:?}")]
    Validation(FieldErrors),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Conflict(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error(transparent)]
    Token(#[from] AuthError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AdminError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => AdminError::Conflict(msg),
            other => AdminError::Store(other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Token plus the admin it was issued for
#[derive(Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub expires_in: i64,
    pub admin: Admin,
}

/// Restaurant owner accounts: signup and login, each returning a bearer token.
#[derive(Clone)]
pub struct AdminService {
    repo: Arc<dyn AdminRepository>,
    tokens: TokenKeys,
}

impl AdminService {
    pub fn new(repo: Arc<dyn AdminRepository>, tokens: TokenKeys) -> Self {
        Self { repo, tokens }
    }

    pub async fn signup(&self, credentials: Credentials) -> Result<Session, AdminError> {
        let email = normalize_email(&credentials.email);

        let mut errors = FieldErrors::new();
        if !email.contains('@') {
            errors.insert("email".to_string(), "a valid email is required".to_string());
        }
        if credentials.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(
                "password".to_string(),
                format!("password must be at least {} characters", MIN_PASSWORD_LEN),
            );
        }
        if !errors.is_empty() {
            return Err(AdminError::Validation(errors));
        }

        let password_hash = hash_password(&credentials.password)?;
        let admin = self
            .repo
            .insert(Admin {
                id: Uuid::new_v4(),
                email,
                password_hash,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(admin_id = %admin.id, "Admin signed up");
        self.session(admin)
    }

    pub async fn login(&self, credentials: Credentials) -> Result<Session, AdminError> {
        let email = normalize_email(&credentials.email);

        let admin = match self.repo.find_by_email(&email).await? {
            Some(admin) if verify_password(&credentials.password, &admin.password_hash) => admin,
            _ => {
                tracing::warn!(email = %email, "Rejected login");
                return Err(AdminError::InvalidCredentials);
            }
        };

        tracing::info!(admin_id = %admin.id, "Admin logged in");
        self.session(admin)
    }

    fn session(&self, admin: Admin) -> Result<Session, AdminError> {
        let issued = self.tokens.issue(&admin)?;
        Ok(Session {
            token: issued.token,
            expires_in: issued.expires_in,
            admin,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> Result<String, AdminError> {
    use argon2::password_hash::rand_core::OsRng;
    use argon2::password_hash::SaltString;
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AdminError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
