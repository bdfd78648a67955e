//! Location model for geographic coordinates and metadata

use serde::{Deserialize, Serialize};

/// Location coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Location name (lake, alp, etc.)
    pub name: String,
    /// Elevation in meters, forwarded to the forecast model when set
    #[serde(default)]
    pub elevation: Option<f64>,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            latitude,
            longitude,
            name,
            elevation: None,
        }
    }

    /// Create location with an explicit elevation
    #[must_use]
    pub fn with_elevation(latitude: f64, longitude: f64, name: String, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            name,
            elevation: Some(elevation),
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        match self.elevation {
            Some(elevation) => format!(
                "{:.4}, {:.4} ({elevation:.0} m)",
                self.latitude, self.longitude
            ),
            None => format!("{:.4}, {:.4}", self.latitude, self.longitude),
        }
    }
}
