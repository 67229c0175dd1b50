//! Fuzz target for pairwise scoring.
//!
//! Arbitrary component values, including NaN and zero benchmarks, must
//! keep the score symmetric and inside [0, 1].

#![no_main]

use arbitrary::Arbitrary;
use fl_common::{
    Benchmarks, BrowserComponent, ComponentBag, HardwareComponent, HashComponent, WebGlComponent,
};
use fl_core::Matcher;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzBag {
    canvas: Option<String>,
    webgl: Option<(String, String, String)>,
    audio: Option<String>,
    browser: Option<(String, String, u32, i32)>,
    hardware: Option<(u32, f64, [f64; 4])>,
}

impl From<FuzzBag> for ComponentBag {
    fn from(f: FuzzBag) -> Self {
        ComponentBag {
            canvas: f.canvas.map(HashComponent::new),
            webgl: f.webgl.map(|(vendor, renderer, hash)| WebGlComponent {
                vendor,
                renderer,
                hash,
            }),
            audio: f.audio.map(HashComponent::new),
            browser: f.browser.map(|(user_agent, language, depth, tz)| BrowserComponent {
                user_agent,
                platform: "Win32".to_string(),
                language,
                screen_resolution: "1920x1080".to_string(),
                color_depth: depth,
                timezone_offset: tz,
                hardware_concurrency: 8,
            }),
            hardware: f.hardware.map(|(cores, memory, b)| HardwareComponent {
                cores,
                memory,
                concurrency: cores,
                benchmarks: Benchmarks {
                    math_ops: b[0],
                    string_ops: b[1],
                    array_ops: b[2],
                    crypto_ops: b[3],
                },
            }),
            port_contention: None,
        }
    }
}

fuzz_target!(|input: (FuzzBag, FuzzBag)| {
    let a = ComponentBag::from(input.0);
    let b = ComponentBag::from(input.1);
    let matcher = Matcher::default();

    let ab = matcher.score(&a, &b);
    let ba = matcher.score(&b, &a);
    assert!((0.0..=1.0 + 1e-9).contains(&ab), "score out of range: {ab}");
    assert_eq!(ab.to_bits(), ba.to_bits());
    let _ = matcher.classify(ab);
});
