//! Device share computation.
//!
//! Shares are rounded to whole percent and must add up to exactly 100. The
//! correction is a single largest-remainder pass: rescale once, then settle
//! the leftover starting at the largest share. It is not repeated until
//! convergence.

pub const PERCENT_TOTAL: i64 = 100;

/// Whole-percent share of `usage` in `daily_usage`. A zero total divides by 1.
pub fn raw_percentage(usage: f64, daily_usage: f64) -> i64 {
    let denominator = if daily_usage == 0.0 { 1.0 } else { daily_usage };
    (usage * 100.0 / denominator).round() as i64
}

/// Correct rounded shares so they sum to [`PERCENT_TOTAL`].
///
/// Negative inputs count as zero. A non-zero sum other than 100 is first
/// rescaled by `100 / sum` with rounding. A positive leftover then goes to
/// the largest share, the first one on ties. A negative leftover is taken
/// from the shares in the same descending order, each giving up at most what
/// it holds, so no share drops below zero. An all-zero input skips the
/// rescale and the first share receives the full 100.
pub fn normalize_percentages(raw: &[i64]) -> Vec<u32> {
    if raw.is_empty() {
        return Vec::new();
    }

    let clamped: Vec<i64> = raw.iter().map(|&p| p.max(0)).collect();
    let sum = saturating_total(&clamped);
    let mut shares: Vec<i64> = if sum == PERCENT_TOTAL || sum == 0 {
        clamped
    } else {
        let factor = PERCENT_TOTAL as f64 / sum as f64;
        clamped
            .iter()
            .map(|&p| (p as f64 * factor).round() as i64)
            .collect()
    };

    let mut leftover = PERCENT_TOTAL - saturating_total(&shares);
    for i in descending_order(&shares) {
        if leftover == 0 {
            break;
        }
        let delta = leftover.max(-shares[i]);
        shares[i] += delta;
        leftover -= delta;
    }

    // every share is now in 0..=100
    shares.into_iter().map(|p| p as u32).collect()
}

fn saturating_total(values: &[i64]) -> i64 {
    values.iter().fold(0i64, |acc, &v| acc.saturating_add(v))
}

/// Indices from largest to smallest value, earlier index first on ties
fn descending_order(values: &[i64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].cmp(&values[a]));
    order
}
