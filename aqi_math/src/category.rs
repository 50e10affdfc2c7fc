//! AQI health categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Health category for an AQI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    /// 0 - 50
    Good,
    /// 51 - 100
    Moderate,
    /// 101 - 150
    UnhealthyForSensitiveGroups,
    /// 151 - 200
    Unhealthy,
    /// 201 - 300
    VeryUnhealthy,
    /// Above 300
    Hazardous,
}

impl AqiCategory {
    /// Classify an AQI value. Upper bounds are inclusive.
    pub fn from_aqi(aqi: f64) -> Self {
        match aqi {
            a if a <= 50.0 => AqiCategory::Good,
            a if a <= 100.0 => AqiCategory::Moderate,
            a if a <= 150.0 => AqiCategory::UnhealthyForSensitiveGroups,
            a if a <= 200.0 => AqiCategory::Unhealthy,
            a if a <= 300.0 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// Display color as a hex string
    pub fn color(&self) -> &'static str {
        match self {
            AqiCategory::Good => "#00e400",
            AqiCategory::Moderate => "#ffff00",
            AqiCategory::UnhealthyForSensitiveGroups => "#ff7e00",
            AqiCategory::Unhealthy => "#ff0000",
            AqiCategory::VeryUnhealthy => "#8f3f97",
            AqiCategory::Hazardous => "#7e0023",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
