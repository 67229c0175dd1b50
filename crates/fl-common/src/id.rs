//! Record, session, and device identity types.
//!
//! A record id names one observation and is never used for matching; device
//! ids are assigned per clustering run and are not stable across runs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of the prefix shown by [`RecordId::short`].
const SHORT_ID_LEN: usize = 16;

/// Content hash of a fingerprint payload (lowercase hex SHA-256).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Hash raw payload bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        RecordId(hex::encode(Sha256::digest(bytes)))
    }

    /// Hash the canonical JSON serialization of a payload.
    ///
    /// Object keys serialize in sorted order, so two payloads with the same
    /// content hash identically regardless of the key order they arrived in.
    pub fn from_payload(payload: &serde_json::Value) -> Self {
        Self::from_bytes(payload.to_string().as_bytes())
    }

    /// Truncated form for listings: the first 16 characters followed by `...`.
    pub fn short(&self) -> String {
        match self.0.char_indices().nth(SHORT_ID_LEN) {
            Some((idx, _)) => format!("{}...", &self.0[..idx]),
            None => format!("{}...", self.0),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(s.to_string())
    }
}

/// Client-generated identifier for one page load.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        SessionId(s.to_string())
    }
}

/// Device group label assigned in creation order during one clustering run.
///
/// Format: `device_<n>` with `n` starting at 1.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct DeviceId(pub String);

impl DeviceId {
    /// Label for the `n`th group created (1-based).
    pub fn sequential(n: usize) -> Self {
        DeviceId(format!("device_{}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_is_sha256_hex() {
        let id = RecordId::from_bytes(b"");
        assert_eq!(
            id.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_record_id_ignores_key_order() {
        let a = json!({"sessionId": "s1", "timestamp": 1});
        let b = json!({"timestamp": 1, "sessionId": "s1"});
        assert_eq!(RecordId::from_payload(&a), RecordId::from_payload(&b));
        assert_ne!(
            RecordId::from_payload(&a),
            RecordId::from_payload(&json!({"sessionId": "s2", "timestamp": 1}))
        );
    }

    #[test]
    fn test_record_id_short() {
        let id = RecordId::from_bytes(b"payload");
        let short = id.short();
        assert_eq!(short.len(), 19);
        assert!(short.ends_with("..."));
        assert!(id.as_str().starts_with(&short[..16]));

        assert_eq!(RecordId::from("abc").short(), "abc...");
    }

    #[test]
    fn test_device_id_sequential() {
        assert_eq!(DeviceId::sequential(1).to_string(), "device_1");
        assert_eq!(DeviceId::sequential(42).as_str(), "device_42");
    }

    #[test]
    fn test_ids_serialize_transparent() {
        let json = serde_json::to_string(&SessionId::from("session_a")).unwrap();
        assert_eq!(json, "\"session_a\"");
        let back: DeviceId = serde_json::from_str("\"device_3\"").unwrap();
        assert_eq!(back, DeviceId::sequential(3));
    }
}
