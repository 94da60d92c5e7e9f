use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Appliance grouping shown in the usage breakdown
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceCategory {
    Climate,
    WaterHeating,
    Kitchen,
    Lighting,
    Electronics,
    Other,
}

/// One row of the per-device usage breakdown.
///
/// `percentage` is the device's integer share of the daily total; across all
/// devices of a snapshot the shares add up to exactly 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceUsage {
    pub id: String,
    pub name: String,
    pub category: DeviceCategory,
    /// Energy used today (kWh), two decimals
    pub usage: f64,
    pub percentage: u32,
    pub unit: String,
}

impl DeviceUsage {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: DeviceCategory,
        usage: f64,
        percentage: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            usage,
            percentage,
            unit: "kWh".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_names() {
        assert_eq!(DeviceCategory::WaterHeating.to_string(), "water_heating");
        assert_eq!(
            DeviceCategory::from_str("climate").unwrap(),
            DeviceCategory::Climate
        );
        assert!(DeviceCategory::from_str("toaster").is_err());
    }

    #[test]
    fn test_new_defaults_to_kwh() {
        let d = DeviceUsage::new("tv", "TV", DeviceCategory::Electronics, 1.2, 4);
        assert_eq!(d.unit, "kWh");
    }
}
