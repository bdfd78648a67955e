//! Valley forecast and mountain temperature series

use super::{HourlySample, Location};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Hourly valley forecast, ordered by timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct ValleyForecast {
    pub location: Location,
    pub hours: Vec<HourlySample>,
}

impl ValleyForecast {
    #[must_use]
    pub fn new(location: Location, mut hours: Vec<HourlySample>) -> Self {
        hours.sort_by_key(|h| h.timestamp);
        Self { location, hours }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }
}

/// Mountain temperatures keyed by local timestamp
///
/// Lookups for timestamps the mountain source did not deliver yield `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MountainSeries {
    temperatures: BTreeMap<NaiveDateTime, f64>,
}

impl MountainSeries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, timestamp: NaiveDateTime, temperature: f64) {
        self.temperatures.insert(timestamp, temperature);
    }

    #[must_use]
    pub fn temperature_at(&self, timestamp: &NaiveDateTime) -> Option<f64> {
        self.temperatures.get(timestamp).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }
}

impl FromIterator<(NaiveDateTime, f64)> for MountainSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDateTime, f64)>>(iter: I) -> Self {
        Self {
            temperatures: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_mountain_lookup_by_timestamp() {
        let series: MountainSeries = [(at(1, 9), 8.5), (at(1, 10), 9.0)].into_iter().collect();
        assert_eq!(series.len(), 2);
        assert_eq!(series.temperature_at(&at(1, 9)), Some(8.5));
        assert_eq!(series.temperature_at(&at(2, 9)), None);
    }

    #[test]
    fn test_valley_forecast_sorted() {
        let sample = |hour| HourlySample {
            timestamp: at(1, hour),
            wind_speed: Some(0.0),
            wind_direction: Some(0.0),
            cloud_cover: Some(0.0),
            temperature: Some(0.0),
        };
        let forecast = ValleyForecast::new(
            Location::new(46.836, 10.508, "Reschensee".to_string()),
            vec![sample(3), sample(1), sample(2)],
        );
        let hours: Vec<_> = forecast.hours.iter().map(HourlySample::hour).collect();
        assert_eq!(hours, vec![1, 2, 3]);
    }
}
