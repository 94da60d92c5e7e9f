use rand::Rng;

/// Round to a fixed number of decimals (half away from zero)
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Move `value` by a uniformly drawn amount of at most `percent` percent of
/// itself, in either direction, and round to two decimals.
pub fn fluctuate<R: Rng>(rng: &mut R, value: f64, percent: f64) -> f64 {
    let delta = rng.gen_range(-1.0f64..=1.0) * (value * percent / 100.0);
    round_to(value + delta, 2)
}

/// Relative change in percent, one decimal. A zero (or non-finite) baseline
/// yields 0 instead of an infinite or NaN change.
pub fn percent_change(old: f64, new: f64) -> f64 {
    if old == 0.0 || !old.is_finite() || !new.is_finite() {
        return 0.0;
    }
    round_to((new - old) / old * 100.0, 1)
}
