//! Fingerprint records and their component bag.
//!
//! Records are read from the collector's append-only log, whose lines look
//! like `{id, sessionId, clientTimestamp, serverTimestamp, data, metadata}`
//! with the collector's long component names (`canvas_fingerprint`,
//! `browser_info`, ...) inside `data`. Both those names and the short
//! canonical names are accepted on input; output always uses the short names.
//!
//! A component is either complete or absent. Anything incomplete or
//! mistyped deserializes as `None` instead of failing the whole record.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::id::{RecordId, SessionId};

/// A single hash-valued component (canvas, audio).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HashComponent {
    pub hash: String,
}

impl HashComponent {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }
}

/// WebGL identity as reported by the GPU driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WebGlComponent {
    pub vendor: String,
    pub renderer: String,
    pub hash: String,
}

impl WebGlComponent {
    /// `vendor|renderer|hash`, the key used for frequency counting.
    pub fn composite_key(&self) -> String {
        format!("{}|{}|{}", self.vendor, self.renderer, self.hash)
    }
}

/// Browser attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BrowserComponent {
    pub user_agent: String,
    pub platform: String,
    pub language: String,
    pub screen_resolution: String,
    pub color_depth: u32,
    pub timezone_offset: i32,
    pub hardware_concurrency: u32,
}

/// Timing microbenchmark results. Values drift between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Benchmarks {
    pub math_ops: f64,
    pub string_ops: f64,
    pub array_ops: f64,
    pub crypto_ops: f64,
}

impl Benchmarks {
    /// Values in a fixed order: math, string, array, crypto.
    pub fn values(&self) -> [f64; 4] {
        [self.math_ops, self.string_ops, self.array_ops, self.crypto_ops]
    }
}

/// Hardware profile: stable counts plus drifting benchmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HardwareComponent {
    pub cores: u32,
    pub memory: f64,
    pub concurrency: u32,
    pub benchmarks: Benchmarks,
}

/// The set of components captured in one observation; each optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComponentBag {
    #[serde(
        default,
        alias = "canvas_fingerprint",
        deserialize_with = "lenient::hash_component",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<HashComponent>")]
    pub canvas: Option<HashComponent>,

    #[serde(
        default,
        alias = "webgl_fingerprint",
        deserialize_with = "lenient::component",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<WebGlComponent>")]
    pub webgl: Option<WebGlComponent>,

    #[serde(
        default,
        alias = "audio_fingerprint",
        deserialize_with = "lenient::hash_component",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<HashComponent>")]
    pub audio: Option<HashComponent>,

    #[serde(
        default,
        alias = "browser_info",
        deserialize_with = "lenient::component",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<BrowserComponent>")]
    pub browser: Option<BrowserComponent>,

    #[serde(
        default,
        alias = "hardware_profile",
        deserialize_with = "lenient::component",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<HardwareComponent>")]
    pub hardware: Option<HardwareComponent>,

    /// Port-contention identifier; only counted by the entropy analyzer.
    #[serde(
        default,
        rename = "portContention",
        alias = "port_contention",
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub port_contention: Option<String>,
}

impl ComponentBag {
    /// Number of scoreable components present (port contention excluded).
    pub fn scoreable_count(&self) -> usize {
        [
            self.canvas.is_some(),
            self.webgl.is_some(),
            self.audio.is_some(),
            self.browser.is_some(),
            self.hardware.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.scoreable_count() == 0 && self.port_contention.is_none()
    }
}

/// One observation as stored in the fingerprint log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintRecord {
    pub id: RecordId,
    pub session_id: SessionId,

    #[serde(
        default,
        deserialize_with = "lenient::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<DateTime<Utc>>")]
    pub client_timestamp: Option<DateTime<Utc>>,

    /// Authoritative for ordering and activity windows.
    pub server_timestamp: DateTime<Utc>,

    #[serde(default, alias = "data")]
    pub components: ComponentBag,

    /// Request metadata captured by the collector; carried, never scored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl FingerprintRecord {
    pub fn new(
        id: RecordId,
        session_id: SessionId,
        server_timestamp: DateTime<Utc>,
        components: ComponentBag,
    ) -> Self {
        Self {
            id,
            session_id,
            client_timestamp: None,
            server_timestamp,
            components,
            metadata: None,
        }
    }

    /// Build a record from a raw collector payload received at `received_at`.
    ///
    /// The payload must be a JSON object carrying a non-empty `sessionId`.
    /// Its `timestamp` becomes the client timestamp and its component fields
    /// become the component bag. The id is the SHA-256 of the payload.
    pub fn from_payload(payload: &serde_json::Value, received_at: DateTime<Utc>) -> Result<Self> {
        let object = payload
            .as_object()
            .ok_or_else(|| Error::InvalidPayload("payload is not a JSON object".to_string()))?;

        let session_id = match object.get("sessionId") {
            Some(serde_json::Value::String(s)) if !s.is_empty() => SessionId(s.clone()),
            _ => return Err(Error::InvalidPayload("missing sessionId".to_string())),
        };

        let components = ComponentBag::deserialize(payload)
            .map_err(|e| Error::InvalidPayload(e.to_string()))?;

        Ok(Self {
            id: RecordId::from_payload(payload),
            session_id,
            client_timestamp: object.get("timestamp").and_then(lenient::parse_timestamp),
            server_timestamp: received_at,
            components,
            metadata: None,
        })
    }

    /// Attach collector metadata (request headers and the like).
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

mod lenient {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::HashComponent;

    /// Whole component or nothing.
    pub fn component<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|v| serde_json::from_value(v).ok()))
    }

    /// `{hash}` object or a bare hash string.
    pub fn hash_component<'de, D>(deserializer: D) -> Result<Option<HashComponent>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(hash)) => Some(HashComponent { hash }),
            Some(other) => serde_json::from_value(other).ok(),
            None => None,
        })
    }

    /// String, or a number rendered as a string.
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(parse_timestamp))
    }

    /// RFC 3339 string or epoch milliseconds.
    pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
        match value {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Value::Number(n) => n
                .as_i64()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            _ => None,
        }
    }
}
