//! Property-based tests for scoring and clustering.
//!
//! Bags are drawn from small alphabets so that partial overlaps (same GPU,
//! different canvas, and so on) come up often.

use fl_common::{
    Benchmarks, BrowserComponent, ComponentBag, FingerprintRecord, HardwareComponent,
    HashComponent, RecordId, SessionId, WebGlComponent,
};
use fl_core::test_utils::{base_time, profile_bag, DeviceProfile, CHROME_WINDOWS_UA, SAFARI_MAC_UA};
use fl_core::{cluster, Matcher};
use proptest::prelude::*;

const TOL: f64 = 1e-12;

fn arb_hash() -> impl Strategy<Value = Option<HashComponent>> {
    prop::option::of(prop::sample::select(vec!["h1", "h2", "h3"]).prop_map(HashComponent::new))
}

fn arb_webgl() -> impl Strategy<Value = Option<WebGlComponent>> {
    prop::option::of(
        (
            prop::sample::select(vec!["NVIDIA Corporation", "AMD"]),
            prop::sample::select(vec!["RTX 3070", "RX 6700 XT"]),
            prop::sample::select(vec!["w1", "w2"]),
        )
            .prop_map(|(vendor, renderer, hash)| WebGlComponent {
                vendor: vendor.to_string(),
                renderer: renderer.to_string(),
                hash: hash.to_string(),
            }),
    )
}

fn arb_browser() -> impl Strategy<Value = Option<BrowserComponent>> {
    prop::option::of(
        (
            prop::sample::select(vec![CHROME_WINDOWS_UA, SAFARI_MAC_UA, ""]),
            prop::sample::select(vec!["Win32", "MacIntel"]),
            prop::sample::select(vec!["en-US", "pt-BR"]),
            prop::sample::select(vec![24u32, 30]),
            prop::sample::select(vec![-480i32, -180]),
            prop::sample::select(vec![8u32, 12]),
        )
            .prop_map(|(ua, platform, language, depth, tz, conc)| BrowserComponent {
                user_agent: ua.to_string(),
                platform: platform.to_string(),
                language: language.to_string(),
                screen_resolution: "1920x1080".to_string(),
                color_depth: depth,
                timezone_offset: tz,
                hardware_concurrency: conc,
            }),
    )
}

fn arb_hardware() -> impl Strategy<Value = Option<HardwareComponent>> {
    prop::option::of(
        (
            prop::sample::select(vec![4u32, 8]),
            prop::sample::select(vec![8.0f64, 16.0]),
            prop::array::uniform4(0.0f64..2000.0),
        )
            .prop_map(|(cores, memory, b)| HardwareComponent {
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
    )
}

fn arb_bag() -> impl Strategy<Value = ComponentBag> {
    (arb_hash(), arb_webgl(), arb_hash(), arb_browser(), arb_hardware()).prop_map(
        |(canvas, webgl, audio, browser, hardware)| ComponentBag {
            canvas,
            webgl,
            audio,
            browser,
            hardware,
            port_contention: None,
        },
    )
}

fn arb_profile_bag() -> impl Strategy<Value = ComponentBag> {
    (prop::sample::select(DeviceProfile::ALL.to_vec()), 0u32..10)
        .prop_map(|(profile, variation)| profile_bag(profile, variation as f64))
}

fn records_from(bags: Vec<ComponentBag>) -> Vec<FingerprintRecord> {
    bags.into_iter()
        .enumerate()
        .map(|(i, bag)| {
            FingerprintRecord::new(
                RecordId::from_bytes(i.to_string().as_bytes()),
                SessionId(format!("s{i}")),
                base_time() + chrono::Duration::seconds(i as i64),
                bag,
            )
        })
        .collect()
}

// ============================================================================
// Scoring
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Scores always land in [0, 1].
    #[test]
    fn score_in_unit_interval(a in arb_bag(), b in arb_bag()) {
        let s = Matcher::default().score(&a, &b);
        prop_assert!((0.0..=1.0 + TOL).contains(&s), "score={}", s);
    }

    /// score(a, b) == score(b, a)
    #[test]
    fn score_is_symmetric(a in arb_bag(), b in arb_bag()) {
        let m = Matcher::default();
        prop_assert!((m.score(&a, &b) - m.score(&b, &a)).abs() <= TOL);
    }

    /// A bag with anything comparable matches itself exactly.
    #[test]
    fn score_is_reflexive(a in arb_bag()) {
        prop_assume!(a.scoreable_count() > 0);
        let s = Matcher::default().score(&a, &a);
        prop_assert!((s - 1.0).abs() <= TOL, "score={}", s);
    }

    /// Nothing comparable means a zero score, not NaN.
    #[test]
    fn empty_side_scores_zero(a in arb_bag()) {
        prop_assert_eq!(Matcher::default().score(&a, &ComponentBag::default()), 0.0);
    }

    /// Higher scores never get a lower confidence tier.
    #[test]
    fn classify_is_monotone(x in 0.0f64..=1.0, y in 0.0f64..=1.0) {
        let m = Matcher::default();
        let (lo, hi) = if x <= y { (x, y) } else { (y, x) };
        prop_assert!(m.classify(lo) <= m.classify(hi));
    }

    /// The match flag agrees with the same-device cutoff.
    #[test]
    fn compare_agrees_with_score(a in arb_profile_bag(), b in arb_profile_bag()) {
        let m = Matcher::default();
        let c = m.compare(&a, &b);
        prop_assert_eq!(c.similarity_score, m.score(&a, &b));
        prop_assert_eq!(c.is_match, m.is_same_device(&a, &b));
        prop_assert_eq!(c.confidence, m.classify(c.similarity_score));
    }
}

// ============================================================================
// Clustering
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every record lands in exactly one group, in input order.
    #[test]
    fn clustering_partitions_input(bags in prop::collection::vec(arb_bag(), 0..24)) {
        let records = records_from(bags);
        let groups = cluster(&Matcher::default(), &records);

        let mut seen: Vec<usize> = groups.iter().flat_map(|g| g.members.iter().copied()).collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..records.len()).collect::<Vec<_>>());

        for g in &groups {
            prop_assert!(!g.is_empty());
            prop_assert!(g.members.windows(2).all(|w| w[0] < w[1]));
        }
        let reps: Vec<_> = groups.iter().map(|g| g.representative()).collect();
        prop_assert!(reps.windows(2).all(|w| w[0] < w[1]));
    }

    /// Members match their representative; representatives never match
    /// an earlier representative.
    #[test]
    fn clustering_respects_representatives(bags in prop::collection::vec(arb_profile_bag(), 0..20)) {
        let m = Matcher::default();
        let records = records_from(bags);
        let groups = cluster(&m, &records);

        for (i, g) in groups.iter().enumerate() {
            let rep = &records[g.representative()].components;
            for &member in &g.members[1..] {
                prop_assert!(m.is_same_device(rep, &records[member].components));
            }
            for earlier in &groups[..i] {
                let anchor = &records[earlier.representative()].components;
                prop_assert!(!m.is_same_device(anchor, rep));
            }
        }
    }

    /// Same input, same partition.
    #[test]
    fn clustering_is_deterministic(bags in prop::collection::vec(arb_bag(), 0..16)) {
        let records = records_from(bags);
        let m = Matcher::default();
        let first: Vec<_> = cluster(&m, &records).into_iter().map(|g| g.members).collect();
        let second: Vec<_> = cluster(&m, &records).into_iter().map(|g| g.members).collect();
        prop_assert_eq!(first, second);
    }
}
