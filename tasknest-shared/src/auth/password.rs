/// Password hashing using Argon2id
///
/// Registration and password changes hash the plaintext through Argon2id
/// with a random per-hash salt; login and password changes verify against
/// the stored PHC string. The length policy lives here too so both entry
/// points (registration and password change) share one rule.
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("correct horse")?;
///
/// assert!(verify_password("correct horse", &hash)?);
/// assert!(!verify_password("wrong horse", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Minimum accepted plaintext password length (inclusive)
pub const PASSWORD_MIN_LEN: usize = 8;

/// Maximum accepted plaintext password length (inclusive)
pub const PASSWORD_MAX_LEN: usize = 16;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password using Argon2id with a random salt
///
/// # Returns
///
/// PHC string format hash (includes algorithm, parameters, salt, and hash),
/// e.g. `$argon2id$v=19$m=19456,t=2,p=1$...$...`.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Comparison is constant-time. A wrong password is `Ok(false)`; only a
/// malformed hash or an internal failure is an `Err`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!(
            "Verification failed: {}",
            e
        ))),
    }
}

/// Checks the plaintext length policy: 8 to 16 characters, inclusive
///
/// Applied before hashing at registration and at password change. Counted in
/// characters, not bytes.
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::password::password_length_ok;
///
/// assert!(password_length_ok("12345678"));       // 8: accepted
/// assert!(password_length_ok("1234567890123456")); // 16: accepted
/// assert!(!password_length_ok("1234567"));       // 7: rejected
/// ```
pub fn password_length_ok(password: &str) -> bool {
    let len = password.chars().count();
    (PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_produces_phc_string() {
        let hash = hash_password("test_password_1").expect("Hash should succeed");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let password = "same_password";

        let hash1 = hash_password(password).expect("Hash 1 should succeed");
        let hash2 = hash_password(password).expect("Hash 2 should succeed");

        // Different salts = different hashes
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let password = "correct_pass";
        let hash = hash_password(password).expect("Hash should succeed");

        assert!(verify_password(password, &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correct_pass").expect("Hash should succeed");

        assert!(!verify_password("wrong_pass", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_empty() {
        let hash = hash_password("password").expect("Hash should succeed");

        assert!(!verify_password("", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("password", "not_a_hash").is_err());
        assert!(verify_password("password", "$argon2id$invalid").is_err());
    }

    #[test]
    fn test_length_policy_boundaries() {
        // Inclusive window: 8 and 16 pass, 7 and 17 fail
        assert!(!password_length_ok("1234567"));
        assert!(password_length_ok("12345678"));
        assert!(password_length_ok("1234567890123456"));
        assert!(!password_length_ok("12345678901234567"));
        assert!(!password_length_ok(""));
    }

    #[test]
    fn test_length_policy_counts_characters_not_bytes() {
        // 8 multi-byte characters
        assert!(password_length_ok("пппппппп"));
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        let passwords = vec!["12345678", "with spaces 1", "sp3cial!@#$%", "密码は8文字です"];

        for password in passwords {
            let hash = hash_password(password).expect("Hash should succeed");
            let verified = verify_password(password, &hash).expect("Verify should succeed");
            assert!(verified, "Password '{}' should verify", password);
        }
    }
}
