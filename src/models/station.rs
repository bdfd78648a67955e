//! Barometric pressure stations

use serde::{Deserialize, Serialize};

/// A weather-portal station page
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PressureStation {
    /// Display name (e.g. "Bozen")
    pub name: String,
    /// Path segment appended to the portal base URL, encodes country and station id
    pub path: String,
}

impl PressureStation {
    #[must_use]
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

/// Current pressure at a station; `pressure_hpa` is `None` when the scrape failed
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PressureReading {
    pub station: PressureStation,
    pub pressure_hpa: Option<f64>,
}

impl PressureReading {
    /// Format pressure with unit
    #[must_use]
    pub fn format_pressure(&self) -> String {
        match self.pressure_hpa {
            Some(p) => format!("{p:.1} hPa"),
            None => "unavailable".to_string(),
        }
    }
}

/// Differential between the south and north station, absent if either is missing
#[must_use]
pub fn pressure_differential(south: &PressureReading, north: &PressureReading) -> Option<f64> {
    Some(south.pressure_hpa? - north.pressure_hpa?)
}
