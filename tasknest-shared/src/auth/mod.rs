/// Authentication utilities
///
/// This module provides the authentication primitives for tasknest:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the plaintext length policy
/// - [`token`]: HS256 session token issuing and verification
/// - [`guard`]: bearer-token request authentication (the access guard)
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::{password, token};
/// use tasknest_shared::models::id::RecordId;
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = password::hash_password("user_password")?;
/// assert!(password::verify_password("user_password", &hash)?);
///
/// // Session token for the logged-in user
/// let user_id = RecordId::generate();
/// let jwt = token::issue(&user_id, "secret-key-of-at-least-32-bytes!", Duration::days(7))?;
/// # Ok(())
/// # }
/// ```

pub mod guard;
pub mod password;
pub mod token;
