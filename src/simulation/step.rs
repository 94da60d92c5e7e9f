use chrono::Utc;
use rand::Rng;

use super::fluctuation::{fluctuate, percent_change, round_to};
use super::normalize::{normalize_percentages, raw_percentage};
use super::tuning::FluctuationTuning;
use crate::domain::{DeviceUsage, Snapshot, TimeSeries};

/// Build the snapshot that follows `prev`.
///
/// Every magnitude is fluctuated independently around its previous value,
/// then the derived fields are recomputed from the new magnitudes: usage
/// changes, savings amount, device shares. `household_value` follows the new
/// daily usage. Only the newest point of each series moves.
pub fn advance<R: Rng>(
    prev: &Snapshot,
    fluctuation_percent: u32,
    tuning: &FluctuationTuning,
    rng: &mut R,
) -> Snapshot {
    let p = f64::from(fluctuation_percent);

    let current_usage = fluctuate(rng, prev.current_usage, p * tuning.current_usage_multiplier);
    let daily_usage = fluctuate(rng, prev.daily_usage, p);
    let potential_savings = fluctuate(rng, prev.potential_savings, p);
    let neighborhood_value = fluctuate(rng, prev.neighborhood_value, p);
    let efficient_value = fluctuate(rng, prev.efficient_value, p);

    let series = prev
        .series
        .iter()
        .map(|(&resolution, s)| {
            let mut values = s.values.clone();
            if let Some(last) = values.last_mut() {
                *last = fluctuate(rng, *last, p * tuning.damping.factor(resolution));
            }
            (resolution, TimeSeries::new(values, s.labels.clone()))
        })
        .collect();

    let mut devices: Vec<DeviceUsage> = prev
        .devices
        .iter()
        .map(|d| DeviceUsage {
            usage: fluctuate(rng, d.usage, p),
            ..d.clone()
        })
        .collect();

    let raw: Vec<i64> = devices
        .iter()
        .map(|d| raw_percentage(d.usage, daily_usage))
        .collect();
    for (device, share) in devices.iter_mut().zip(normalize_percentages(&raw)) {
        device.percentage = share;
    }

    Snapshot {
        sequence: prev.sequence + 1,
        generated_at: Utc::now(),
        current_usage,
        current_usage_change: percent_change(prev.current_usage, current_usage),
        daily_usage,
        daily_usage_change: percent_change(prev.daily_usage, daily_usage),
        potential_savings,
        potential_savings_amount: round_to(potential_savings * tuning.savings_amount_factor, 2),
        household_value: daily_usage,
        neighborhood_value,
        efficient_value,
        series,
        devices,
    }
}
