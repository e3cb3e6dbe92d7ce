//! Repositories for database operations

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::error::DatabaseError as _;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::validation::normalize_email;

pub mod message;

pub use message::MessageRepository;

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user
    ///
    /// The email domain is lower-cased and the name defaults to the
    /// local part of the email when not supplied. The password is
    /// stored as an argon2 hash.
    pub async fn create(&self, email: &str, name: Option<&str>, password: &str) -> ApiResult<User> {
        let email = normalize_email(email);

        let name = match name {
            Some(n) if !n.trim().is_empty() => n.to_string(),
            _ => email
                .rsplit_once('@')
                .map(|(local, _)| local.to_string())
                .unwrap_or_else(|| email.clone()),
        };

        let password_hash = hash_password(password)?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApiError::validation("email", "A user with this email already exists")
            }
            other => ApiError::Database(other),
        })?;

        info!("Created user {}", user.id);
        Ok(user)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Verify a user's password
    pub async fn verify_password(&self, user: &User, password: &str) -> ApiResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
            error!("Failed to parse password hash: {}", e);
            ApiError::InternalServerError
        })?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }

    /// Update a user's name and/or password
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        password: Option<&str>,
    ) -> ApiResult<User> {
        let mut user = self.find_by_id(id).await?.ok_or(ApiError::NotFound)?;

        if let Some(name) = name {
            user.name = name.to_string();
        }

        if let Some(password) = password {
            user.password_hash = hash_password(password)?;
        }

        user.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE users
            SET name = ?1, password_hash = ?2, updated_at = ?3
            WHERE id = ?4
            "#,
        )
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Remove a user and all their messages
    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        sqlx::query("DELETE FROM messages WHERE user_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        info!("Deleted user {}", id);
        Ok(())
    }
}

fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::InternalServerError
        })?
        .to_string();

    Ok(hash)
}
