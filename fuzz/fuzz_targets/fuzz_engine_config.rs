//! Fuzz target for engine.json parsing and validation.
//!
//! Parsing and validation should never panic, only return an error. A
//! config that validates must yield a usable matcher and engine.

#![no_main]

use chrono::{TimeZone, Utc};
use fl_config::validate::validate_engine_config;
use fl_config::EngineConfig;
use fl_core::{Engine, Matcher};
use fl_common::ComponentBag;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<EngineConfig>(data) else {
        return;
    };
    if validate_engine_config(&config).is_err() {
        return;
    }

    let matcher = Matcher::from_config(&config);
    let empty = ComponentBag::default();
    assert_eq!(matcher.score(&empty, &empty), 0.0);

    let Some(now) = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single() else {
        return;
    };
    let stats = Engine::from_config(&config).stats(&[], now);
    assert_eq!(stats.total_fingerprints, 0);
});
