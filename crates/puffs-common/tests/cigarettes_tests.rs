//! Property-style tests for the cigarette-equivalent conversion.

use puffs_common::{convert, Tier, AQI_PER_CIGARETTE};

// ============================================================================
// Formula
// ============================================================================

#[test]
fn test_value_matches_formula_over_range() {
    for aqi in -50..=1000 {
        let expected = (f64::from(aqi) / 23.5 * 10.0).round() / 10.0;
        assert_eq!(convert(aqi).value, expected, "aqi={}", aqi);
    }
}

#[test]
fn test_divisor_is_fixed() {
    assert_eq!(AQI_PER_CIGARETTE, 23.5);
}

#[test]
fn test_round_trip_for_whole_cigarettes() {
    // 23.5 * n is an integer AQI only for even n
    for n in (0..=40).step_by(2) {
        let aqi = (AQI_PER_CIGARETTE * f64::from(n)) as i32;
        assert_eq!(convert(aqi).value, f64::from(n), "n={}", n);
    }
}

// ============================================================================
// Monotonicity
// ============================================================================

#[test]
fn test_value_is_monotonic() {
    let mut previous = convert(-100).value;
    for aqi in -99..=1000 {
        let current = convert(aqi).value;
        assert!(current >= previous, "value decreased at aqi={}", aqi);
        previous = current;
    }
}

#[test]
fn test_tier_is_monotonic() {
    let mut previous = convert(-100).tier;
    for aqi in -99..=1000 {
        let current = convert(aqi).tier;
        assert!(current >= previous, "tier decreased at aqi={}", aqi);
        previous = current;
    }
}

// ============================================================================
// Tier bands
// ============================================================================

#[test]
fn test_every_band_edge() {
    let edges = [
        (50, Tier::Good, Tier::Moderate),
        (100, Tier::Moderate, Tier::UnhealthySensitive),
        (150, Tier::UnhealthySensitive, Tier::Unhealthy),
        (200, Tier::Unhealthy, Tier::VeryUnhealthy),
        (300, Tier::VeryUnhealthy, Tier::Hazardous),
    ];

    for (edge, at, above) in edges {
        assert_eq!(convert(edge).tier, at, "aqi={}", edge);
        assert_eq!(convert(edge + 1).tier, above, "aqi={}", edge + 1);
    }
}

#[test]
fn test_no_gaps_between_bands() {
    // Each step changes tier by at most one band
    for aqi in 0..1000 {
        let a = convert(aqi).tier as u8;
        let b = convert(aqi + 1).tier as u8;
        assert!(b == a || b == a + 1, "gap between {} and {}", aqi, aqi + 1);
    }
}

#[test]
fn test_hazardous_has_no_upper_bound() {
    assert_eq!(convert(500).tier, Tier::Hazardous);
    assert_eq!(convert(i32::MAX).tier, Tier::Hazardous);
}
