/// Record identifiers
///
/// Every persisted record (user or task) is keyed by a 24-character lowercase
/// hexadecimal string, generated from 12 random bytes. The format is checked
/// at the API boundary before any store access, so malformed identifiers are
/// rejected with a validation error instead of reaching the database.
///
/// # Example
///
/// ```
/// use tasknest_shared::models::id::RecordId;
///
/// let id = RecordId::generate();
/// assert_eq!(id.as_str().len(), 24);
///
/// // Round-trips through its string form
/// let parsed = RecordId::parse(id.as_str()).unwrap();
/// assert_eq!(parsed, id);
///
/// // Anything that is not exactly 24 hex digits is rejected
/// assert!(RecordId::parse("not-an-id").is_err());
/// assert!(RecordId::parse("0123456789abcdef0123456").is_err());
/// ```

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error returned when a string is not a well-formed record identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid record identifier: expected 24 hexadecimal characters")]
pub struct InvalidRecordId;

/// A 24-character lowercase hexadecimal record identifier
///
/// Stored as-is in the database; serializes as a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
#[serde(try_from = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Generates a fresh identifier from 12 random bytes
    pub fn generate() -> Self {
        let mut bytes = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Parses an identifier, accepting exactly 24 hex digits
    ///
    /// Uppercase input is accepted and normalized to lowercase, matching the
    /// case-insensitive identifier matching of the original store.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRecordId`] for any other input.
    pub fn parse(raw: &str) -> Result<Self, InvalidRecordId> {
        if raw.len() == 24 && raw.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(InvalidRecordId)
        }
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RecordId {
    type Error = InvalidRecordId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl std::str::FromStr for RecordId {
    type Err = InvalidRecordId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_well_formed() {
        let id = RecordId::generate();
        assert_eq!(id.as_str().len(), 24);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(RecordId::parse(id.as_str()).unwrap(), id);
    }

    #[test]
    fn test_generate_is_unique() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_accepts_24_hex_chars() {
        let id = RecordId::parse("0123456789abcdef01234567").unwrap();
        assert_eq!(id.as_str(), "0123456789abcdef01234567");
    }

    #[test]
    fn test_parse_normalizes_uppercase() {
        let id = RecordId::parse("0123456789ABCDEF01234567").unwrap();
        assert_eq!(id.as_str(), "0123456789abcdef01234567");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        // Wrong length
        assert!(RecordId::parse("0123456789abcdef0123456").is_err());
        assert!(RecordId::parse("0123456789abcdef012345678").is_err());
        assert!(RecordId::parse("").is_err());

        // Non-hex characters
        assert!(RecordId::parse("0123456789abcdef0123456g").is_err());
        assert!(RecordId::parse("xxxxxxxxxxxxxxxxxxxxxxxx").is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let id = RecordId::parse("5f8d0d55b54764421b715f00").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"5f8d0d55b54764421b715f00\"");

        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_deserialize_rejects_malformed() {
        let result: Result<RecordId, _> = serde_json::from_str("\"nope\"");
        assert!(result.is_err());
    }
}
