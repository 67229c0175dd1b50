//! fplink common types, IDs, and errors.
//!
//! This crate provides the data model shared across fl-core modules:
//! - Fingerprint records and their component bag
//! - Record, session, and device identity types
//! - Common error types with stable codes
//! - Output format specifications

pub mod error;
pub mod id;
pub mod output;
pub mod record;

pub use error::{Error, Result};
pub use id::{DeviceId, RecordId, SessionId};
pub use output::OutputFormat;
pub use record::{
    Benchmarks, BrowserComponent, ComponentBag, FingerprintRecord, HardwareComponent,
    HashComponent, WebGlComponent,
};

/// Schema version stamped on every JSON document fplink emits.
pub const SCHEMA_VERSION: &str = "1.0.0";
