//! Fuzz target for fingerprint log lines and collector payloads.
//!
//! Parsing must never panic; anything that parses must score against
//! itself without producing NaN.

#![no_main]

use chrono::{TimeZone, Utc};
use fl_common::FingerprintRecord;
use fl_core::Matcher;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(record) = serde_json::from_str::<FingerprintRecord>(text) {
        let score = Matcher::default().score(&record.components, &record.components);
        assert!(!score.is_nan());
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
        let received = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let _ = FingerprintRecord::from_payload(&value, received);
    }
});
