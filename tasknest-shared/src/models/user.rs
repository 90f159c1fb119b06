/// User model and database operations
///
/// This module provides the User model and the credential-store operations
/// behind registration, login, profile updates, and password changes.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id VARCHAR(24) PRIMARY KEY,
///     name TEXT NOT NULL,
///     email TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Email uniqueness is enforced by the database; a violated constraint
/// surfaces as a conflict at the API boundary. Passwords are stored as
/// Argon2id hashes and never leave this layer in any public projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::id::RecordId;

/// User row as stored in the database
///
/// Not serialized to the wire directly; use [`UserPublic`] or
/// [`UserProfile`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user identifier
    pub id: RecordId,

    /// Display name
    pub name: String,

    /// Email address, unique across all users, stored case-sensitively
    pub email: String,

    /// Argon2id password hash (PHC string)
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Public projection returned from register, login, and profile update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    /// Unique user identifier
    pub id: RecordId,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,
}

/// Minimal projection returned from the current-user endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name
    pub name: String,

    /// Email address
    pub email: String,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

impl User {
    /// Public projection of this row
    pub fn public(&self) -> UserPublic {
        UserPublic {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    /// Profile projection of this row
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    /// Creates a new user
    ///
    /// The identifier is generated server-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint
    /// violation) or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(RecordId::generate())
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by identifier
    pub async fn find_by_id(pool: &PgPool, id: &RecordId) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Checks whether an email belongs to a user other than `id`
    ///
    /// Backs the profile-update conflict check: changing your email to one
    /// you already own is fine, taking someone else's is not.
    pub async fn email_taken_by_other(
        pool: &PgPool,
        email: &str,
        id: &RecordId,
    ) -> Result<bool, sqlx::Error> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 AND id <> $2)",
        )
        .bind(email)
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(taken)
    }

    /// Updates name and email for a user
    ///
    /// # Returns
    ///
    /// The updated row, or `None` if the identity no longer exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: &RecordId,
        name: &str,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Replaces the stored password hash for a user
    ///
    /// # Returns
    ///
    /// True if the user was found and updated, false otherwise.
    pub async fn update_password(
        pool: &PgPool,
        id: &RecordId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: RecordId::parse("5f8d0d55b54764421b715f00").unwrap(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_projection_omits_hash() {
        let user = sample_user();
        let public = user.public();

        let json = serde_json::to_value(&public).unwrap();
        assert_eq!(json["id"], "5f8d0d55b54764421b715f00");
        assert_eq!(json["name"], "Test User");
        assert_eq!(json["email"], "test@example.com");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn test_profile_projection_is_name_and_email_only() {
        let user = sample_user();
        let json = serde_json::to_value(user.profile()).unwrap();

        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["name"], "Test User");
        assert_eq!(obj["email"], "test@example.com");
    }

    // Integration tests for database operations require a running database
}
