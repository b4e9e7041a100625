//! AQI to cigarette-equivalent conversion.
//!
//! Rule of thumb: 22-25 AQI is roughly one cigarette per day. The midpoint
//! 23.5 is used as a fixed divisor. This is an approximation based on
//! particulate matter exposure, not medical advice.

use serde::Serialize;

/// AQI points per cigarette smoked per day.
pub const AQI_PER_CIGARETTE: f64 = 23.5;

/// Upper inclusive AQI bound for each tier below Hazardous, ascending.
const TIER_THRESHOLDS: [(i32, Tier); 5] = [
    (50, Tier::Good),
    (100, Tier::Moderate),
    (150, Tier::UnhealthySensitive),
    (200, Tier::Unhealthy),
    (300, Tier::VeryUnhealthy),
];

/// AQI severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Tier {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl Tier {
    /// First tier whose inclusive upper bound contains `aqi`.
    pub fn from_aqi(aqi: i32) -> Self {
        TIER_THRESHOLDS
            .iter()
            .find(|(max, _)| aqi <= *max)
            .map(|(_, tier)| *tier)
            .unwrap_or(Tier::Hazardous)
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Good => "Good",
            Tier::Moderate => "Moderate",
            Tier::UnhealthySensitive => "Unhealthy for Sensitive",
            Tier::Unhealthy => "Unhealthy",
            Tier::VeryUnhealthy => "Very Unhealthy",
            Tier::Hazardous => "Hazardous",
        }
    }

    /// Display colour name.
    pub fn color(&self) -> &'static str {
        match self {
            Tier::Good => "green",
            Tier::Moderate => "yellow",
            Tier::UnhealthySensitive => "orange",
            Tier::Unhealthy => "red",
            Tier::VeryUnhealthy => "purple",
            Tier::Hazardous => "maroon",
        }
    }
}

/// Daily cigarette count and severity tier derived from an AQI value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CigaretteEquivalent {
    /// Cigarettes per day, rounded to one decimal.
    pub value: f64,
    pub tier: Tier,
}

/// Convert an AQI value to its cigarette equivalent.
pub fn convert(aqi: i32) -> CigaretteEquivalent {
    CigaretteEquivalent {
        value: round_one_decimal(f64::from(aqi) / AQI_PER_CIGARETTE),
        tier: Tier::from_aqi(aqi),
    }
}

fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(convert(50).tier, Tier::Good);
        assert_eq!(convert(51).tier, Tier::Moderate);
        assert_eq!(convert(100).tier, Tier::Moderate);
        assert_eq!(convert(101).tier, Tier::UnhealthySensitive);
        assert_eq!(convert(150).tier, Tier::UnhealthySensitive);
        assert_eq!(convert(151).tier, Tier::Unhealthy);
        assert_eq!(convert(200).tier, Tier::Unhealthy);
        assert_eq!(convert(201).tier, Tier::VeryUnhealthy);
        assert_eq!(convert(300).tier, Tier::VeryUnhealthy);
        assert_eq!(convert(301).tier, Tier::Hazardous);
    }

    #[test]
    fn test_zero_and_negative_are_good() {
        assert_eq!(convert(0).tier, Tier::Good);
        assert_eq!(convert(0).value, 0.0);
        assert_eq!(convert(-5).tier, Tier::Good);
    }

    #[test]
    fn test_value_rounding() {
        assert_eq!(convert(23).value, 1.0);
        assert_eq!(convert(47).value, 2.0);
        assert_eq!(convert(100).value, 4.3);
        assert_eq!(convert(155).value, 6.6);
        assert_eq!(convert(999).value, 42.5);
    }

    #[test]
    fn test_thresholds_are_ascending() {
        for pair in TIER_THRESHOLDS.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            assert!(pair[0].1 < pair[1].1);
        }
    }

    #[test]
    fn test_labels_and_colors() {
        assert_eq!(Tier::UnhealthySensitive.label(), "Unhealthy for Sensitive");
        assert_eq!(Tier::Hazardous.color(), "maroon");
        assert_eq!(Tier::from_aqi(75).color(), "yellow");
    }
}
