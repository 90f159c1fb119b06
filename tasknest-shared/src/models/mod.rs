/// Database models for tasknest
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `id`: 24-character hexadecimal record identifiers
/// - `user`: User accounts backing registration and login
/// - `task`: Owner-scoped task records
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         name: "John Doe".to_string(),
///         email: "user@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod id;
pub mod task;
pub mod user;
