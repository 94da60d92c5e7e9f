use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::device::{DeviceCategory, DeviceUsage};

/// Time-series granularity
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Resolution {
    Day,
    Week,
    Month,
    Year,
}

/// Values with their axis labels; both vectors always have the same length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub values: Vec<f64>,
    pub labels: Vec<String>,
}

impl TimeSeries {
    pub fn new(values: Vec<f64>, labels: Vec<String>) -> Self {
        debug_assert_eq!(values.len(), labels.len());
        Self { values, labels }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// One complete synthetic telemetry reading.
///
/// Published behind an `Arc` and never mutated after publication; a tick
/// builds a new snapshot from the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Ticks applied since the seed snapshot
    pub sequence: u64,
    pub generated_at: DateTime<Utc>,

    /// Instantaneous power (kW)
    pub current_usage: f64,
    /// Percent change against the previous snapshot, one decimal
    pub current_usage_change: f64,
    /// Energy used today (kWh)
    pub daily_usage: f64,
    pub daily_usage_change: f64,

    /// Achievable saving (percent of daily usage)
    pub potential_savings: f64,
    pub potential_savings_amount: f64,

    // Comparative benchmarks (kWh)
    pub household_value: f64,
    pub neighborhood_value: f64,
    pub efficient_value: f64,

    pub series: BTreeMap<Resolution, TimeSeries>,
    pub devices: Vec<DeviceUsage>,
}

impl Snapshot {
    /// Fixed starting point of every simulation run
    pub fn seed() -> Self {
        let mut series = BTreeMap::new();
        series.insert(
            Resolution::Day,
            TimeSeries::new(
                vec![
                    0.8, 0.7, 0.6, 0.6, 0.7, 0.9, 1.6, 2.4, 2.1, 1.5, 1.3, 1.2, 1.4, 1.3, 1.2,
                    1.5, 2.2, 3.1, 3.4, 2.9, 2.5, 2.0, 1.4, 1.0,
                ],
                (0..24).map(|h| format!("{h:02}:00")).collect(),
            ),
        );
        series.insert(
            Resolution::Week,
            TimeSeries::new(
                vec![27.3, 26.8, 29.1, 28.4, 30.2, 33.5, 31.8],
                labels(&["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]),
            ),
        );
        series.insert(
            Resolution::Month,
            TimeSeries::new(
                vec![196.4, 201.2, 189.7, 198.5],
                (1..=4).map(|w| format!("Week {w}")).collect(),
            ),
        );
        series.insert(
            Resolution::Year,
            TimeSeries::new(
                vec![
                    945.2, 860.4, 812.6, 701.3, 622.8, 598.1, 655.4, 671.9, 640.2, 735.8, 842.5,
                    931.7,
                ],
                labels(&[
                    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov",
                    "Dec",
                ]),
            ),
        );

        let devices = vec![
            DeviceUsage::new("hvac", "Heating & Cooling", DeviceCategory::Climate, 12.83, 45),
            DeviceUsage::new("water-heater", "Water Heater", DeviceCategory::WaterHeating, 7.98, 28),
            DeviceUsage::new("kitchen", "Kitchen Appliances", DeviceCategory::Kitchen, 4.28, 15),
            DeviceUsage::new("lighting", "Lighting", DeviceCategory::Lighting, 2.0, 7),
            DeviceUsage::new("electronics", "Electronics", DeviceCategory::Electronics, 1.43, 5),
        ];

        Self {
            sequence: 0,
            generated_at: Utc::now(),
            current_usage: 3.2,
            current_usage_change: 2.4,
            daily_usage: 28.5,
            daily_usage_change: -5.2,
            potential_savings: 12.0,
            potential_savings_amount: 1.8,
            household_value: 28.5,
            neighborhood_value: 32.4,
            efficient_value: 21.6,
            series,
            devices,
        }
    }

    pub fn series(&self, resolution: Resolution) -> Option<&TimeSeries> {
        self.series.get(&resolution)
    }

    /// Sum of all device shares
    pub fn percentage_total(&self) -> u32 {
        self.devices.iter().map(|d| d.percentage).sum()
    }
}

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
