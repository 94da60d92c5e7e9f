use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum_macros::{AsRefStr, Display, EnumIter};

pub const MIN_UPDATE_INTERVAL_MS: u64 = 1_000;
pub const MAX_UPDATE_INTERVAL_MS: u64 = 10_000;
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 3_000;

pub const MIN_FLUCTUATION_PERCENT: u32 = 1;
pub const MAX_FLUCTUATION_PERCENT: u32 = 20;
pub const DEFAULT_FLUCTUATION_PERCENT: u32 = 5;

/// Persisted setting keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, Display, EnumIter)]
pub enum SettingKey {
    #[strum(serialize = "simulation:enabled")]
    Enabled,
    #[strum(serialize = "simulation:interval")]
    Interval,
    #[strum(serialize = "simulation:fluctuation")]
    Fluctuation,
}

/// Simulation parameters.
///
/// Only constructed through [`Default`] or the clamping helpers, so the
/// interval and fluctuation fields are always within their bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub enabled: bool,
    pub update_interval_ms: u64,
    pub fluctuation_percent: u32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            fluctuation_percent: DEFAULT_FLUCTUATION_PERCENT,
        }
    }
}

impl SimulationSettings {
    pub fn clamp_update_interval(ms: u64) -> u64 {
        ms.clamp(MIN_UPDATE_INTERVAL_MS, MAX_UPDATE_INTERVAL_MS)
    }

    pub fn clamp_fluctuation(percent: u32) -> u32 {
        percent.clamp(MIN_FLUCTUATION_PERCENT, MAX_FLUCTUATION_PERCENT)
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    /// String encoding of one field as written to the key/value store
    pub fn encode(&self, key: SettingKey) -> String {
        match key {
            SettingKey::Enabled => self.enabled.to_string(),
            SettingKey::Interval => self.update_interval_ms.to_string(),
            SettingKey::Fluctuation => self.fluctuation_percent.to_string(),
        }
    }
}
