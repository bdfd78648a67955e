//! Kiteable wind window
//!
//! An hour is kiteable when it falls in the afternoon thermal window and the
//! forecast wind is strong enough and blows from the southern sector along
//! the lake.

use super::day_evaluator::HourlyRecord;
use crate::models::HourlySample;

/// Hour, speed and direction limits for a kiteable hour (all bounds inclusive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KiteableWindow {
    pub first_hour: u32,
    pub last_hour: u32,
    /// Minimum wind speed, in the forecast's wind speed unit
    pub min_wind_speed: f64,
    pub direction_start: f64,
    pub direction_stop: f64,
}

pub const KITEABLE_WINDOW: KiteableWindow = KiteableWindow {
    first_hour: 11,
    last_hour: 16,
    min_wind_speed: 6.2,
    direction_start: 140.0,
    direction_stop: 220.0,
};

impl KiteableWindow {
    #[must_use]
    pub fn contains_hour(&self, hour: u32) -> bool {
        (self.first_hour..=self.last_hour).contains(&hour)
    }

    /// Missing speed or direction never counts as kiteable
    #[must_use]
    pub fn is_kiteable(&self, record: &HourlyRecord) -> bool {
        let (Some(speed), Some(direction)) = (record.wind_speed, record.wind_direction) else {
            return false;
        };
        self.contains_hour(record.hour)
            && speed >= self.min_wind_speed
            && is_angle_in_range(direction, self.direction_start, self.direction_stop)
    }

    /// One-line description for report footers
    #[must_use]
    pub fn describe(&self, wind_speed_unit: &str) -> String {
        format!(
            "{:02}:00-{:02}:59, wind >= {} {}, from {:.0}-{:.0}° ({}-{})",
            self.first_hour,
            self.last_hour,
            self.min_wind_speed,
            wind_speed_unit,
            self.direction_start,
            self.direction_stop,
            HourlySample::wind_direction_to_cardinal(self.direction_start),
            HourlySample::wind_direction_to_cardinal(self.direction_stop),
        )
    }
}

/// Check if an angle is within a directional range, handling 360-degree wraparound
fn is_angle_in_range(angle: f64, start: f64, stop: f64) -> bool {
    let normalize = |a: f64| a.rem_euclid(360.0);
    let angle = normalize(angle);
    let start = normalize(start);
    let stop = normalize(stop);

    if start <= stop {
        angle >= start && angle <= stop
    } else {
        // Range wraps around 360/0 degrees
        angle >= start || angle <= stop
    }
}
