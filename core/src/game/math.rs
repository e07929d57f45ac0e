use super::{HARVEST_MORALE_SWING, MAX_MORALE, MIN_MORALE, NEUTRAL_MORALE, TAX_MORALE_SWING};

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(value))
}

/// Harvest multiplier in `[0.6, 1.4]`; morale outside 0..=100 is clamped first.
pub fn compute_harvest_factor(morale: f64) -> f64 {
    morale_factor(morale, HARVEST_MORALE_SWING)
}

/// Tax multiplier in `[0.7, 1.3]`.
pub fn compute_tax_factor(morale: f64) -> f64 {
    morale_factor(morale, TAX_MORALE_SWING)
}

fn morale_factor(morale: f64, swing: f64) -> f64 {
    let m = clamp(morale, f64::from(MIN_MORALE), f64::from(MAX_MORALE));
    1.0 + swing * ((m - NEUTRAL_MORALE) / NEUTRAL_MORALE)
}

/// Rounds halves towards positive infinity (`2.5 -> 3`, `-2.5 -> -2`).
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn clamp_bounds_correctly() {
        assert_eq!(clamp(-10.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp(50.0, 0.0, 100.0), 50.0);
        assert_eq!(clamp(150.0, 0.0, 100.0), 100.0);
    }

    #[test]
    fn harvest_factor_at_key_morale_points() {
        assert!((compute_harvest_factor(50.0) - 1.0).abs() < 1e-12);
        assert!((compute_harvest_factor(100.0) - 1.4).abs() < 1e-12);
        assert!((compute_harvest_factor(0.0) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn tax_factor_at_key_morale_points() {
        assert!((compute_tax_factor(50.0) - 1.0).abs() < 1e-12);
        assert!((compute_tax_factor(100.0) - 1.3).abs() < 1e-12);
        assert!((compute_tax_factor(0.0) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn factors_saturate_outside_morale_range() {
        assert!((compute_harvest_factor(140.0) - 1.4).abs() < 1e-12);
        assert!((compute_tax_factor(-20.0) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn round_half_up_matches_browser_rounding() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.4), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
    }

    proptest! {
        #[test]
        fn prop_factors_are_monotonic(a in 0.0..100.0f64, b in 0.0..100.0f64) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(compute_harvest_factor(low) <= compute_harvest_factor(high));
            prop_assert!(compute_tax_factor(low) <= compute_tax_factor(high));
        }
    }
}
