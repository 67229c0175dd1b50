//! Per-component sub-scores, each in `[0, 1]`.
//!
//! The internal splits here (WebGL 0.6/0.3/0.1, browser 4 + 6x1, hardware
//! 2/2/1, benchmark bands) are fixed; only the weights that combine the
//! sub-scores are configurable.

use fl_common::{Benchmarks, BrowserComponent, HardwareComponent, HashComponent, WebGlComponent};

use super::user_agent::browser_family;

const WEBGL_VENDOR: f64 = 0.6;
const WEBGL_RENDERER: f64 = 0.3;
const WEBGL_HASH: f64 = 0.1;

const BROWSER_FAMILY_POINTS: f64 = 4.0;
const BROWSER_ATTRIBUTE_POINTS: f64 = 1.0;
const BROWSER_TOTAL_POINTS: f64 = BROWSER_FAMILY_POINTS + 6.0 * BROWSER_ATTRIBUTE_POINTS;

const HW_CORES_POINTS: f64 = 2.0;
const HW_MEMORY_POINTS: f64 = 2.0;
const HW_CONCURRENCY_POINTS: f64 = 1.0;
const HW_TOTAL_POINTS: f64 = HW_CORES_POINTS + HW_MEMORY_POINTS + HW_CONCURRENCY_POINTS;

/// `(minimum ratio, similarity)` bands, checked top-down.
const BENCHMARK_BANDS: [(f64, f64); 4] = [(0.9, 1.0), (0.8, 0.9), (0.7, 0.7), (0.6, 0.5)];
/// Similarity for any ratio below the lowest band.
const BENCHMARK_FLOOR: f64 = 0.3;

fn points(matched: bool, weight: f64) -> f64 {
    if matched {
        weight
    } else {
        0.0
    }
}

/// Canvas and audio: exact hash equality.
pub fn hash_score(a: &HashComponent, b: &HashComponent) -> f64 {
    points(a.hash == b.hash, 1.0)
}

pub fn webgl_score(a: &WebGlComponent, b: &WebGlComponent) -> f64 {
    let achieved = points(a.vendor == b.vendor, WEBGL_VENDOR)
        + points(a.renderer == b.renderer, WEBGL_RENDERER)
        + points(a.hash == b.hash, WEBGL_HASH);
    achieved / (WEBGL_VENDOR + WEBGL_RENDERER + WEBGL_HASH)
}

/// Browser family (4 points) plus six attributes (1 point each).
pub fn browser_score(a: &BrowserComponent, b: &BrowserComponent) -> f64 {
    let family = browser_family(&a.user_agent) == browser_family(&b.user_agent);
    let attributes = [
        a.platform == b.platform,
        a.language == b.language,
        a.screen_resolution == b.screen_resolution,
        a.color_depth == b.color_depth,
        a.timezone_offset == b.timezone_offset,
        a.hardware_concurrency == b.hardware_concurrency,
    ];

    let achieved = points(family, BROWSER_FAMILY_POINTS)
        + attributes
            .iter()
            .map(|matched| points(*matched, BROWSER_ATTRIBUTE_POINTS))
            .sum::<f64>();
    achieved / BROWSER_TOTAL_POINTS
}

/// Cores, memory, and concurrency: exact equality tally.
pub fn hardware_stable_score(a: &HardwareComponent, b: &HardwareComponent) -> f64 {
    let achieved = points(a.cores == b.cores, HW_CORES_POINTS)
        + points(a.memory == b.memory, HW_MEMORY_POINTS)
        + points(a.concurrency == b.concurrency, HW_CONCURRENCY_POINTS);
    achieved / HW_TOTAL_POINTS
}

/// Mean banded similarity over the four benchmarks.
pub fn hardware_dynamic_score(a: &HardwareComponent, b: &HardwareComponent) -> f64 {
    benchmarks_score(&a.benchmarks, &b.benchmarks)
}

pub fn benchmarks_score(a: &Benchmarks, b: &Benchmarks) -> f64 {
    let values_a = a.values();
    let values_b = b.values();
    let total: f64 = values_a
        .iter()
        .zip(values_b.iter())
        .map(|(x, y)| benchmark_similarity(*x, *y))
        .sum();
    total / values_a.len() as f64
}

/// Similarity of two timing values through the tolerance bands.
///
/// Both zero is a match; exactly one zero is a miss. Otherwise the
/// min/max ratio is mapped to a stepped score.
pub fn benchmark_similarity(v1: f64, v2: f64) -> f64 {
    match (v1 == 0.0, v2 == 0.0) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }

    let ratio = v1.min(v2) / v1.max(v2);
    BENCHMARK_BANDS
        .iter()
        .find(|(min_ratio, _)| ratio >= *min_ratio)
        .map(|(_, similarity)| *similarity)
        .unwrap_or(BENCHMARK_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn browser(ua: &str) -> BrowserComponent {
        BrowserComponent {
            user_agent: ua.to_string(),
            platform: "Win32".to_string(),
            language: "en-US".to_string(),
            screen_resolution: "1920x1080".to_string(),
            color_depth: 24,
            timezone_offset: -480,
            hardware_concurrency: 8,
        }
    }

    fn hardware(cores: u32, memory: f64, concurrency: u32, base: f64) -> HardwareComponent {
        HardwareComponent {
            cores,
            memory,
            concurrency,
            benchmarks: Benchmarks {
                math_ops: base,
                string_ops: base,
                array_ops: base,
                crypto_ops: base,
            },
        }
    }

    #[test]
    fn test_benchmark_bands() {
        assert_eq!(benchmark_similarity(100.0, 100.0), 1.0);
        assert_eq!(benchmark_similarity(100.0, 90.0), 1.0);
        assert_eq!(benchmark_similarity(100.0, 89.0), 0.9);
        assert_eq!(benchmark_similarity(100.0, 80.0), 0.9);
        assert_eq!(benchmark_similarity(100.0, 75.0), 0.7);
        assert_eq!(benchmark_similarity(100.0, 65.0), 0.5);
        assert_eq!(benchmark_similarity(100.0, 59.0), 0.3);
        assert_eq!(benchmark_similarity(1.0, 1000.0), 0.3);
    }

    #[test]
    fn test_benchmark_zero_handling() {
        assert_eq!(benchmark_similarity(0.0, 0.0), 1.0);
        assert_eq!(benchmark_similarity(0.0, 5.0), 0.0);
        assert_eq!(benchmark_similarity(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_benchmark_similarity_is_symmetric() {
        assert_eq!(benchmark_similarity(72.0, 100.0), benchmark_similarity(100.0, 72.0));
    }

    #[test]
    fn test_webgl_split() {
        let a = WebGlComponent {
            vendor: "NVIDIA Corporation".to_string(),
            renderer: "RTX 3070".to_string(),
            hash: "h1".to_string(),
        };
        let mut b = a.clone();
        assert_eq!(webgl_score(&a, &b), 1.0);
        b.hash = "h2".to_string();
        assert!((webgl_score(&a, &b) - 0.9).abs() < 1e-12);
        b.renderer = "RTX 4090".to_string();
        assert!((webgl_score(&a, &b) - 0.6).abs() < 1e-12);
        b.vendor = "AMD".to_string();
        assert_eq!(webgl_score(&a, &b), 0.0);
    }

    #[test]
    fn test_browser_family_carries_four_points() {
        let chrome = browser("Mozilla/5.0 Chrome/120.0 Safari/537.36");
        let firefox = browser("Mozilla/5.0 Gecko/20100101 Firefox/120.0");
        assert_eq!(browser_score(&chrome, &chrome), 1.0);
        assert!((browser_score(&chrome, &firefox) - 0.6).abs() < 1e-12);

        let mut other_screen = chrome.clone();
        other_screen.screen_resolution = "2560x1440".to_string();
        assert!((browser_score(&chrome, &other_screen) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_hardware_stable_tally() {
        let a = hardware(8, 16.0, 8, 1000.0);
        assert_eq!(hardware_stable_score(&a, &a), 1.0);
        assert!((hardware_stable_score(&a, &hardware(8, 16.0, 12, 1000.0)) - 0.8).abs() < 1e-12);
        assert!((hardware_stable_score(&a, &hardware(12, 16.0, 12, 1000.0)) - 0.4).abs() < 1e-12);
        assert_eq!(hardware_stable_score(&a, &hardware(12, 32.0, 12, 1000.0)), 0.0);
    }

    #[test]
    fn test_hardware_dynamic_averages_bands() {
        let a = hardware(8, 16.0, 8, 1000.0);
        let mut b = a.clone();
        b.benchmarks.math_ops = 500.0;
        // Three benchmarks at 1.0, one at 0.3.
        assert!((hardware_dynamic_score(&a, &b) - 0.825).abs() < 1e-12);
    }

    #[test]
    fn test_hash_score() {
        assert_eq!(hash_score(&HashComponent::new("a"), &HashComponent::new("a")), 1.0);
        assert_eq!(hash_score(&HashComponent::new("a"), &HashComponent::new("b")), 0.0);
    }
}
