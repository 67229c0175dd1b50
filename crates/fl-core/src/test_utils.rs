//! Test utilities for fl-core.
//!
//! Device profiles modeled on real collector output, with a `variation`
//! knob that shifts the timing benchmarks the way session-to-session load
//! does (roughly 5% per step).

use chrono::{DateTime, Duration, TimeZone, Utc};
use fl_common::{
    Benchmarks, BrowserComponent, ComponentBag, FingerprintRecord, HardwareComponent,
    HashComponent, RecordId, SessionId, WebGlComponent,
};

/// Assert that two floating point numbers are approximately equal.
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr) => {
        $crate::assert_approx_eq!($a, $b, 1e-6_f64)
    };
    ($a:expr, $b:expr, $epsilon:expr) => {{
        let a: f64 = $a;
        let b: f64 = $b;
        let eps: f64 = $epsilon;
        let diff = (a - b).abs();
        if diff > eps {
            panic!(
                "assertion failed: `(left ~= right)` (left: `{}`, right: `{}`, diff: `{}`, epsilon: `{}`)",
                a, b, diff, eps
            );
        }
    }};
}

pub const CHROME_WINDOWS_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const FIREFOX_WINDOWS_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0";
pub const CHROME_ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 12; SM-G998B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
pub const SAFARI_MAC_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceProfile {
    /// Windows desktop, Chrome, RTX 3070.
    DesktopChromeNvidia,
    /// The same desktop in Firefox: same GPU, different canvas/audio/UA.
    DesktopFirefoxNvidia,
    /// Windows desktop, Chrome, RX 6700 XT.
    DesktopChromeAmd,
    /// Android phone, Chrome, Adreno 640.
    MobileChromeAndroid,
    /// MacBook Pro M1, Safari.
    MacbookSafari,
}

impl DeviceProfile {
    pub const ALL: [DeviceProfile; 5] = [
        DeviceProfile::DesktopChromeNvidia,
        DeviceProfile::DesktopFirefoxNvidia,
        DeviceProfile::DesktopChromeAmd,
        DeviceProfile::MobileChromeAndroid,
        DeviceProfile::MacbookSafari,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            DeviceProfile::DesktopChromeNvidia => "desktop_chrome_nvidia",
            DeviceProfile::DesktopFirefoxNvidia => "desktop_firefox_nvidia",
            DeviceProfile::DesktopChromeAmd => "desktop_chrome_amd",
            DeviceProfile::MobileChromeAndroid => "mobile_chrome_android",
            DeviceProfile::MacbookSafari => "macbook_safari",
        }
    }
}

fn hash(h: &str) -> Option<HashComponent> {
    Some(HashComponent::new(h))
}

fn webgl(vendor: &str, renderer: &str, hash: &str) -> Option<WebGlComponent> {
    Some(WebGlComponent {
        vendor: vendor.to_string(),
        renderer: renderer.to_string(),
        hash: hash.to_string(),
    })
}

fn browser(
    ua: &str,
    platform: &str,
    language: &str,
    screen: &str,
    color_depth: u32,
    timezone_offset: i32,
    concurrency: u32,
) -> Option<BrowserComponent> {
    Some(BrowserComponent {
        user_agent: ua.to_string(),
        platform: platform.to_string(),
        language: language.to_string(),
        screen_resolution: screen.to_string(),
        color_depth,
        timezone_offset,
        hardware_concurrency: concurrency,
    })
}

/// `base[i] + variation * step[i]` for math, string, array, crypto.
fn hardware(
    cores: u32,
    memory: f64,
    base: [f64; 4],
    step: [f64; 4],
    variation: f64,
) -> Option<HardwareComponent> {
    Some(HardwareComponent {
        cores,
        memory,
        concurrency: cores,
        benchmarks: Benchmarks {
            math_ops: base[0] + variation * step[0],
            string_ops: base[1] + variation * step[1],
            array_ops: base[2] + variation * step[2],
            crypto_ops: base[3] + variation * step[3],
        },
    })
}

/// Component bag for a profile with the given benchmark variation.
pub fn profile_bag(profile: DeviceProfile, variation: f64) -> ComponentBag {
    match profile {
        DeviceProfile::DesktopChromeNvidia => ComponentBag {
            canvas: hash("canvas_nvidia_chrome_001"),
            webgl: webgl(
                "NVIDIA Corporation",
                "NVIDIA GeForce RTX 3070/PCIe/SSE2",
                "webgl_nvidia_001",
            ),
            audio: hash("audio_windows_001"),
            browser: browser(CHROME_WINDOWS_UA, "Win32", "en-US", "1920x1080", 24, -480, 8),
            hardware: hardware(
                8,
                16.0,
                [1000.0, 800.0, 900.0, 700.0],
                [50.0, 40.0, 45.0, 35.0],
                variation,
            ),
            port_contention: None,
        },
        DeviceProfile::DesktopFirefoxNvidia => ComponentBag {
            canvas: hash("canvas_nvidia_firefox_001"),
            webgl: webgl(
                "NVIDIA Corporation",
                "NVIDIA GeForce RTX 3070/PCIe/SSE2",
                "webgl_nvidia_001",
            ),
            audio: hash("audio_windows_firefox_001"),
            browser: browser(FIREFOX_WINDOWS_UA, "Win32", "en-US", "1920x1080", 24, -480, 8),
            hardware: hardware(
                8,
                16.0,
                [950.0, 750.0, 850.0, 650.0],
                [50.0, 40.0, 45.0, 35.0],
                variation,
            ),
            port_contention: None,
        },
        DeviceProfile::DesktopChromeAmd => ComponentBag {
            canvas: hash("canvas_amd_chrome_001"),
            webgl: webgl("AMD", "AMD Radeon RX 6700 XT", "webgl_amd_001"),
            audio: hash("audio_windows_002"),
            browser: browser(CHROME_WINDOWS_UA, "Win32", "pt-BR", "2560x1440", 24, -180, 12),
            hardware: hardware(
                12,
                32.0,
                [1200.0, 1000.0, 1100.0, 900.0],
                [60.0, 50.0, 55.0, 45.0],
                variation,
            ),
            port_contention: None,
        },
        DeviceProfile::MobileChromeAndroid => ComponentBag {
            canvas: hash("canvas_mobile_chrome_001"),
            webgl: webgl("Qualcomm", "Adreno (TM) 640", "webgl_mobile_001"),
            audio: hash("audio_android_001"),
            browser: browser(CHROME_ANDROID_UA, "Linux armv8l", "en-US", "412x915", 24, -480, 8),
            hardware: hardware(
                8,
                8.0,
                [600.0, 500.0, 550.0, 450.0],
                [30.0, 25.0, 28.0, 23.0],
                variation,
            ),
            port_contention: None,
        },
        DeviceProfile::MacbookSafari => ComponentBag {
            canvas: hash("canvas_mac_safari_001"),
            webgl: webgl("Apple Inc.", "Apple M1 Pro", "webgl_apple_001"),
            audio: hash("audio_mac_001"),
            browser: browser(SAFARI_MAC_UA, "MacIntel", "en-US", "1728x1117", 30, -480, 10),
            hardware: hardware(
                10,
                32.0,
                [1500.0, 1200.0, 1350.0, 1100.0],
                [75.0, 60.0, 68.0, 55.0],
                variation,
            ),
            port_contention: None,
        },
    }
}

/// Fixed reference instant for generated records.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// A full record for a profile. `seq` orders records one minute apart
/// and makes ids and sessions distinct.
pub fn profile_record(profile: DeviceProfile, variation: f64, seq: usize) -> FingerprintRecord {
    FingerprintRecord::new(
        RecordId::from_bytes(format!("{}:{}:{}", profile.slug(), variation, seq).as_bytes()),
        SessionId(format!("session_{}_{}", profile.slug(), seq)),
        base_time() + Duration::minutes(seq as i64),
        profile_bag(profile, variation),
    )
}

/// Seven records from four physical devices: three desktop-NVIDIA
/// collections, two desktop-AMD collections, one phone, one MacBook.
pub fn four_device_stream() -> Vec<FingerprintRecord> {
    use DeviceProfile::*;
    [
        (DesktopChromeNvidia, 0.0),
        (DesktopChromeNvidia, 1.0),
        (DesktopChromeNvidia, 2.0),
        (DesktopChromeAmd, 0.0),
        (DesktopChromeAmd, 1.0),
        (MobileChromeAndroid, 0.0),
        (MacbookSafari, 0.0),
    ]
    .into_iter()
    .enumerate()
    .map(|(seq, (profile, variation))| profile_record(profile, variation, seq))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_are_complete() {
        for profile in DeviceProfile::ALL {
            assert_eq!(profile_bag(profile, 0.0).scoreable_count(), 5, "{:?}", profile);
        }
    }

    #[test]
    fn test_profile_records_are_distinct() {
        let a = profile_record(DeviceProfile::MacbookSafari, 0.0, 0);
        let b = profile_record(DeviceProfile::MacbookSafari, 0.0, 1);
        assert_ne!(a.id, b.id);
        assert_ne!(a.session_id, b.session_id);
        assert!(b.server_timestamp > a.server_timestamp);
    }

    #[test]
    fn test_four_device_stream_shape() {
        assert_eq!(four_device_stream().len(), 7);
    }
}
