/// Session token issuing and verification
///
/// Session tokens are JWTs signed with HS256. A token carries the user
/// identifier and an expiration; verification checks signature, expiry, and
/// issuer, and yields the identifier alone. There are no roles or extra
/// claims beyond identity.
///
/// The lifetime is passed in by the caller (it lives in the server
/// configuration, default 7 days); this module never reads the environment.
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::token::{issue, verify};
/// use tasknest_shared::models::id::RecordId;
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let user_id = RecordId::generate();
///
/// let token = issue(&user_id, secret, Duration::days(7))?;
/// let claims = verify(&token, secret)?;
/// assert_eq!(claims.sub, user_id.as_str());
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::id::RecordId;

/// Issuer claim stamped into every token
const ISSUER: &str = "tasknest";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token failed validation (bad signature, issuer, or format)
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// JWT claims carried by a session token
///
/// - `sub`: the user identifier (24-hex record id as a string)
/// - `iss`: always "tasknest"
/// - `iat`/`exp`: Unix timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user identifier
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user with the given lifetime
    pub fn new(user_id: &RecordId, ttl: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + ttl;

        Self {
            sub: user_id.as_str().to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// The subject parsed back into a record identifier
    ///
    /// Fails only if the token was signed with a malformed subject, which a
    /// token issued by [`issue`] never is.
    pub fn user_id(&self) -> Result<RecordId, TokenError> {
        RecordId::parse(&self.sub)
            .map_err(|e| TokenError::ValidationError(format!("Bad subject claim: {}", e)))
    }
}

/// Issues a signed session token for a user
///
/// # Errors
///
/// Returns `TokenError::CreateError` if encoding fails.
pub fn issue(user_id: &RecordId, secret: &str, ttl: Duration) -> Result<String, TokenError> {
    let claims = Claims::new(user_id, ttl);
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, &claims, &key)
        .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies a session token and extracts its claims
///
/// Verifies signature, expiration, and issuer. Expiry surfaces as the
/// distinct [`TokenError::Expired`] variant; every other failure is
/// [`TokenError::ValidationError`].
pub fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = RecordId::generate();
        let claims = Claims::new(&user_id, Duration::days(7));

        assert_eq!(claims.sub, user_id.as_str());
        assert_eq!(claims.iss, "tasknest");
        assert!(!claims.is_expired());
        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let user_id = RecordId::generate();

        let token = issue(&user_id, SECRET, Duration::days(7)).expect("Should create token");
        let claims = verify(&token, SECRET).expect("Should validate token");

        assert_eq!(claims.sub, user_id.as_str());
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.iss, "tasknest");
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let token = issue(&RecordId::generate(), SECRET, Duration::days(7)).unwrap();

        let result = verify(&token, "a-completely-different-secret-key");
        assert!(result.is_err());
    }

    #[test]
    fn test_verify_expired_token() {
        let user_id = RecordId::generate();

        // Issued already expired; jsonwebtoken applies default leeway, so go
        // well past it
        let token = issue(&user_id, SECRET, Duration::seconds(-3600)).unwrap();

        let result = verify(&token, SECRET);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_verify_garbage_token() {
        assert!(verify("not.a.token", SECRET).is_err());
        assert!(verify("", SECRET).is_err());
    }

    #[test]
    fn test_verify_rejects_tampered_token() {
        let token = issue(&RecordId::generate(), SECRET, Duration::days(7)).unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push('x');

        assert!(verify(&tampered, SECRET).is_err());
    }
}
