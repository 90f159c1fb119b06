/// Request authentication guard
///
/// The single choke point for every protected operation. A request moves
/// from unverified to authenticated (an [`AuthUser`] attached) or is
/// rejected with an [`AuthError`]; no task or profile handler is reachable
/// any other way.
///
/// The guard itself is a plain async function over `(pool, secret, header)`,
/// composed in front of the protected routers by the API crate's middleware
/// layer. There is no implicit chaining: the layer calls [`authenticate`],
/// inserts the result into request extensions, and handlers extract it with
/// `Extension<AuthUser>`.
///
/// # Rejections
///
/// 1. Header absent or not the `Bearer <token>` scheme → token missing
/// 2. Token fails signature/expiry/issuer checks → token invalid or expired
/// 3. Verified identifier no longer resolves to a stored user (deleted
///    after issuance) → user not found
///
/// All three map to 401 at the boundary.

use serde::Serialize;
use sqlx::PgPool;

use super::token;
use crate::models::{id::RecordId, user::User};

/// Authenticated identity attached to a request after the guard passes
///
/// Carries the resolved user minus the password hash; the hash never leaves
/// the store layer.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    /// Unique user identifier
    pub id: RecordId,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Error type for the authentication guard
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Authorization header absent or not a Bearer token
    #[error("Not authorized, token missing.")]
    MissingToken,

    /// Token failed verification or has expired
    #[error("Token invalid or expired.")]
    InvalidToken,

    /// Token was valid but the user no longer exists
    #[error("User not found.")]
    UserGone,

    /// Store failure while resolving the user
    #[error("Authentication lookup failed")]
    Store(#[from] sqlx::Error),
}

/// Extracts the token from an `Authorization: Bearer <token>` header value
///
/// # Errors
///
/// Returns [`AuthError::MissingToken`] when the header is absent, uses a
/// different scheme, or carries an empty token.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AuthError> {
    let header = authorization.ok_or(AuthError::MissingToken)?;
    let token = header.strip_prefix("Bearer ").ok_or(AuthError::MissingToken)?;

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}

/// Authenticates a request from its authorization header
///
/// Verifies the bearer token and resolves the embedded identifier to a
/// stored user.
///
/// # Errors
///
/// See the module-level rejection list; store failures surface as
/// [`AuthError::Store`].
pub async fn authenticate(
    pool: &PgPool,
    secret: &str,
    authorization: Option<&str>,
) -> Result<AuthUser, AuthError> {
    let raw = bearer_token(authorization)?;

    let claims = token::verify(raw, secret).map_err(|e| {
        tracing::debug!("Token verification failed: {}", e);
        AuthError::InvalidToken
    })?;

    let user_id = claims.user_id().map_err(|_| AuthError::InvalidToken)?;

    let user = User::find_by_id(pool, &user_id)
        .await?
        .ok_or(AuthError::UserGone)?;

    Ok(AuthUser::from(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        assert!(matches!(bearer_token(None), Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        assert!(matches!(
            bearer_token(Some("Basic dXNlcjpwYXNz")),
            Err(AuthError::MissingToken)
        ));
        // Scheme match is exact, including case
        assert!(matches!(
            bearer_token(Some("bearer abc")),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_bearer_token_empty_token() {
        assert!(matches!(
            bearer_token(Some("Bearer ")),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_rejection_messages() {
        // These strings are part of the wire contract
        assert_eq!(
            AuthError::MissingToken.to_string(),
            "Not authorized, token missing."
        );
        assert_eq!(
            AuthError::InvalidToken.to_string(),
            "Token invalid or expired."
        );
        assert_eq!(AuthError::UserGone.to_string(), "User not found.");
    }
}
