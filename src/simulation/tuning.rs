use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::Resolution;

/// Variance multipliers applied on top of the configured fluctuation range.
///
/// The defaults are visual tuning values: instantaneous power moves twice as
/// much as the daily totals, and coarser series move less than finer ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FluctuationTuning {
    #[validate(range(min = 0.0, max = 4.0))]
    pub current_usage_multiplier: f64,
    /// Converts the savings percentage into the displayed savings amount
    #[validate(range(min = 0.0, max = 1.0))]
    pub savings_amount_factor: f64,
    #[validate(nested)]
    pub damping: ResolutionDamping,
}

impl Default for FluctuationTuning {
    fn default() -> Self {
        Self {
            current_usage_multiplier: 2.0,
            savings_amount_factor: 0.15,
            damping: ResolutionDamping::default(),
        }
    }
}

/// Per-resolution multiplier for the latest series point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ResolutionDamping {
    #[validate(range(min = 0.0, max = 4.0))]
    pub day: f64,
    #[validate(range(min = 0.0, max = 4.0))]
    pub week: f64,
    #[validate(range(min = 0.0, max = 4.0))]
    pub month: f64,
    #[validate(range(min = 0.0, max = 4.0))]
    pub year: f64,
}

impl Default for ResolutionDamping {
    fn default() -> Self {
        Self {
            day: 1.6,
            week: 1.0,
            month: 0.6,
            year: 0.4,
        }
    }
}

impl ResolutionDamping {
    pub fn factor(&self, resolution: Resolution) -> f64 {
        match resolution {
            Resolution::Day => self.day,
            Resolution::Week => self.week,
            Resolution::Month => self.month,
            Resolution::Year => self.year,
        }
    }
}
