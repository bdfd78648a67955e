//! Hourly valley weather sample

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// One forecast hour at the valley point; a value is `None` when the model returned null
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlySample {
    /// Local wall-clock timestamp in the forecast timezone
    pub timestamp: NaiveDateTime,
    /// Wind speed at 10 m, in the configured unit
    pub wind_speed: Option<f64>,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction: Option<f64>,
    /// Cloud cover percentage (0-100)
    pub cloud_cover: Option<f64>,
    /// Temperature at 2 m in Celsius
    pub temperature: Option<f64>,
}

impl HourlySample {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    #[must_use]
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.wind_speed.is_some()
            && self.wind_direction.is_some()
            && self.cloud_cover.is_some()
            && self.temperature.is_some()
    }

    /// Convert wind direction from degrees to cardinal direction
    #[must_use]
    pub fn wind_direction_to_cardinal(degrees: f64) -> &'static str {
        match degrees.rem_euclid(360.0).round() as u16 {
            0..=11 | 349..=360 => "N",
            12..=33 => "NNE",
            34..=56 => "NE",
            57..=78 => "ENE",
            79..=101 => "E",
            102..=123 => "ESE",
            124..=146 => "SE",
            147..=168 => "SSE",
            169..=191 => "S",
            192..=213 => "SSW",
            214..=236 => "SW",
            237..=258 => "WSW",
            259..=281 => "W",
            282..=303 => "WNW",
            304..=326 => "NW",
            327..=348 => "NNW",
            _ => "Unknown",
        }
    }
}
