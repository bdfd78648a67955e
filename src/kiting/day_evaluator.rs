//! Per-day evaluation
//!
//! Valley hours are joined with the mountain temperature for the same local
//! timestamp, grouped by calendar date, reduced to a few day-level
//! observations and then scored.

use super::scoring::{DailyMetrics, SharedConditions};
use super::wind_analysis::KITEABLE_WINDOW;
use crate::models::{MountainSeries, ValleyForecast};
use chrono::NaiveDate;
use std::ops::RangeInclusive;
use tracing::debug;

/// Morning hours whose cloud cover decides whether the valley heats up
const MORNING_CLOUD_HOURS: RangeInclusive<u32> = 6..=10;
/// Hours in which the valley and mountain temperatures are compared
const TEMP_DIFF_HOURS: RangeInclusive<u32> = 9..=10;

/// One valley hour with the mountain temperature attached when available
///
/// Any value may be missing; each metric skips the missing values in its own window.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    pub date: NaiveDate,
    pub hour: u32,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub temp_valley: Option<f64>,
    pub temp_mountain: Option<f64>,
}

/// The records of a single calendar date
#[derive(Debug, Clone, PartialEq)]
pub struct DayRecords {
    pub date: NaiveDate,
    pub records: Vec<HourlyRecord>,
}

/// Day-level inputs to the score
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayObservations {
    pub cloud_morning_avg: Option<f64>,
    pub temp_diff_mountain_valley: Option<f64>,
    pub kiteable_hour_count: usize,
}

impl DayObservations {
    #[must_use]
    pub fn from_records(records: &[HourlyRecord]) -> Self {
        Self {
            cloud_morning_avg: cloud_morning_avg(records),
            temp_diff_mountain_valley: temp_diff_mountain_valley(records),
            kiteable_hour_count: kiteable_hour_count(records),
        }
    }
}

/// Build one record per valley hour, looking up the mountain temperature by timestamp
#[must_use]
pub fn join_hourly(valley: &ValleyForecast, mountain: &MountainSeries) -> Vec<HourlyRecord> {
    let records: Vec<HourlyRecord> = valley
        .hours
        .iter()
        .map(|sample| HourlyRecord {
            date: sample.date(),
            hour: sample.hour(),
            wind_speed: sample.wind_speed,
            wind_direction: sample.wind_direction,
            cloud_cover: sample.cloud_cover,
            temp_valley: sample.temperature,
            temp_mountain: mountain.temperature_at(&sample.timestamp),
        })
        .collect();

    let matched = records.iter().filter(|r| r.temp_mountain.is_some()).count();
    debug!(
        "Joined {} valley hours, {} with a mountain temperature",
        records.len(),
        matched
    );
    records
}

/// Partition records by date, keeping dates in the order they first appear
#[must_use]
pub fn group_by_day(records: Vec<HourlyRecord>) -> Vec<DayRecords> {
    let mut days: Vec<DayRecords> = Vec::new();

    for record in records {
        match days.iter_mut().find(|day| day.date == record.date) {
            Some(day) => day.records.push(record),
            None => days.push(DayRecords {
                date: record.date,
                records: vec![record],
            }),
        }
    }

    days
}

/// Score every day in the joined records
#[must_use]
pub fn evaluate_days(records: Vec<HourlyRecord>, shared: &SharedConditions) -> Vec<DailyMetrics> {
    group_by_day(records)
        .into_iter()
        .map(|day| {
            let observations = DayObservations::from_records(&day.records);
            let metrics = DailyMetrics::evaluate(day.date, &observations, shared);
            debug!(
                date = %metrics.date,
                score = metrics.score,
                status = %metrics.status,
                "Evaluated day"
            );
            metrics
        })
        .collect()
}

#[must_use]
pub fn cloud_morning_avg(records: &[HourlyRecord]) -> Option<f64> {
    mean(
        records
            .iter()
            .filter(|r| MORNING_CLOUD_HOURS.contains(&r.hour))
            .filter_map(|r| r.cloud_cover),
    )
}

/// Mean mountain temperature minus mean valley temperature in the comparison hours
#[must_use]
pub fn temp_diff_mountain_valley(records: &[HourlyRecord]) -> Option<f64> {
    let window: Vec<&HourlyRecord> = records
        .iter()
        .filter(|r| TEMP_DIFF_HOURS.contains(&r.hour))
        .collect();

    let mountain = mean(window.iter().filter_map(|r| r.temp_mountain))?;
    let valley = mean(window.iter().filter_map(|r| r.temp_valley))?;
    Some(mountain - valley)
}

#[must_use]
pub fn kiteable_hour_count(records: &[HourlyRecord]) -> usize {
    records
        .iter()
        .filter(|r| KITEABLE_WINDOW.is_kiteable(r))
        .count()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kiting::scoring::KiteStatus;
    use crate::models::{HourlySample, Location};
    use chrono::NaiveDateTime;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn record(hour: u32) -> HourlyRecord {
        HourlyRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            hour,
            wind_speed: Some(0.0),
            wind_direction: Some(0.0),
            cloud_cover: Some(0.0),
            temp_valley: Some(15.0),
            temp_mountain: None,
        }
    }

    fn sample(day: u32, hour: u32, temperature: f64) -> HourlySample {
        HourlySample {
            timestamp: at(day, hour),
            wind_speed: Some(10.0),
            wind_direction: Some(180.0),
            cloud_cover: Some(20.0),
            temperature: Some(temperature),
        }
    }

    fn valley(hours: Vec<HourlySample>) -> ValleyForecast {
        ValleyForecast::new(Location::new(46.836, 10.508, "Reschensee".to_string()), hours)
    }

    #[test]
    fn test_join_by_timestamp() {
        let forecast = valley(vec![sample(1, 9, 14.0), sample(1, 10, 15.0), sample(2, 9, 16.0)]);
        let mountain: MountainSeries = [(at(1, 9), 21.0), (at(1, 10), 22.0)].into_iter().collect();

        let records = join_hourly(&forecast, &mountain);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].temp_mountain, Some(21.0));
        assert_eq!(records[1].temp_mountain, Some(22.0));
        assert_eq!(records[2].temp_mountain, None);
        assert_eq!(records[2].temp_valley, Some(16.0));
    }

    #[test]
    fn test_join_with_shifted_mountain_series() {
        let forecast = valley(vec![sample(1, 9, 14.0), sample(1, 10, 15.0)]);
        let mountain: MountainSeries = [(at(1, 10), 22.0), (at(1, 11), 23.0)].into_iter().collect();

        let records = join_hourly(&forecast, &mountain);
        assert_eq!(records[0].temp_mountain, None);
        assert_eq!(records[1].temp_mountain, Some(22.0));
    }

    #[test]
    fn test_group_preserves_first_seen_order() {
        let mut records = vec![record(6), record(7)];
        let mut later = record(8);
        later.date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let mut earlier = record(9);
        earlier.date = NaiveDate::from_ymd_opt(2024, 5, 30).unwrap();
        records.push(later);
        records.push(earlier);

        let days = group_by_day(records);
        let dates: Vec<_> = days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-06-01", "2024-06-03", "2024-05-30"]);
        assert_eq!(days[0].records.len(), 2);
    }

    #[test]
    fn test_cloud_morning_avg_window() {
        let records: Vec<_> = (0..24)
            .map(|hour| HourlyRecord {
                cloud_cover: Some(if (6..=10).contains(&hour) { 40.0 } else { 100.0 }),
                ..record(hour)
            })
            .collect();
        assert_eq!(cloud_morning_avg(&records), Some(40.0));
    }

    #[test]
    fn test_cloud_morning_avg_absent_without_morning_hours() {
        let records = vec![record(12), record(13)];
        assert_eq!(cloud_morning_avg(&records), None);
    }

    #[test]
    fn test_temp_diff_mountain_minus_valley() {
        let records = vec![
            HourlyRecord {
                temp_valley: Some(12.0),
                temp_mountain: Some(20.0),
                ..record(9)
            },
            HourlyRecord {
                temp_valley: Some(14.0),
                temp_mountain: Some(20.0),
                ..record(10)
            },
            HourlyRecord {
                temp_valley: Some(30.0),
                temp_mountain: Some(0.0),
                ..record(11)
            },
        ];
        assert_eq!(temp_diff_mountain_valley(&records), Some(7.0));
    }

    #[test]
    fn test_temp_diff_zero_is_present() {
        let records = vec![HourlyRecord {
            temp_valley: Some(10.0),
            temp_mountain: Some(10.0),
            ..record(9)
        }];
        assert_eq!(temp_diff_mountain_valley(&records), Some(0.0));
    }

    #[test]
    fn test_temp_diff_absent_without_mountain() {
        let records = vec![record(9), record(10)];
        assert_eq!(temp_diff_mountain_valley(&records), None);
    }

    #[test]
    fn test_kiteable_hours_monotonic() {
        let good = |hour| HourlyRecord {
            wind_speed: Some(15.0),
            wind_direction: Some(190.0),
            ..record(hour)
        };
        let mut records = vec![record(12)];
        let mut previous = kiteable_hour_count(&records);
        for hour in 11..=16 {
            records.push(good(hour));
            let count = kiteable_hour_count(&records);
            assert!(count >= previous);
            previous = count;
        }
        assert_eq!(previous, 6);
    }

    #[test]
    fn test_evaluate_days_is_idempotent() {
        let forecast = valley((0..48).map(|h| sample(1 + h / 24, h % 24, 15.0)).collect());
        let mountain: MountainSeries = (0..24).map(|h| (at(1, h), 22.0)).collect();
        let shared = SharedConditions {
            pressure_diff: Some(1.5),
            webcam_clear: Some(true),
        };

        let first = evaluate_days(join_hourly(&forecast, &mountain), &shared);
        let second = evaluate_days(join_hourly(&forecast, &mountain), &shared);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);

        // cloud 20 -> +30, pressure +10, temp diff 7 -> +15, six kiteable hours -> +60
        assert_eq!(first[0].score, 115);
        assert_eq!(first[0].status, KiteStatus::Go);
        // no mountain data for the second day
        assert_eq!(first[1].temp_diff_mountain_valley, None);
        assert_eq!(first[1].score, 95);
    }

    #[test]
    fn test_scenario_e_empty_mountain_series() {
        let hours = (6..=16)
            .map(|h| HourlySample {
                cloud_cover: Some(10.0),
                wind_speed: Some(if (11..=13).contains(&h) { 8.0 } else { 2.0 }),
                ..sample(1, h, 18.0)
            })
            .collect();
        let records = join_hourly(&valley(hours), &MountainSeries::new());
        let days = evaluate_days(records, &SharedConditions::default());

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].kiteable_hour_count, 3);
        assert_eq!(days[0].score, 55);
        assert_eq!(days[0].status, KiteStatus::Risky);
    }

    #[test]
    fn test_null_cloud_cover_keeps_kiteable_hour() {
        let hours = (0..24)
            .map(|h| HourlySample {
                wind_speed: Some(14.0),
                wind_direction: Some(190.0),
                cloud_cover: if h == 12 { None } else { Some(20.0) },
                ..sample(1, h, 15.0)
            })
            .collect();
        let records = join_hourly(&valley(hours), &MountainSeries::new());

        assert_eq!(kiteable_hour_count(&records), 6);
        assert_eq!(cloud_morning_avg(&records), Some(20.0));
    }

    #[test]
    fn test_metrics_skip_missing_values() {
        let records = vec![
            HourlyRecord {
                cloud_cover: None,
                temp_valley: None,
                temp_mountain: Some(20.0),
                ..record(9)
            },
            HourlyRecord {
                cloud_cover: Some(50.0),
                temp_valley: Some(14.0),
                temp_mountain: Some(20.0),
                ..record(10)
            },
        ];
        assert_eq!(cloud_morning_avg(&records), Some(50.0));
        assert_eq!(temp_diff_mountain_valley(&records), Some(6.0));
    }

    #[test]
    fn test_temp_diff_absent_without_valley_temperature() {
        let records = vec![HourlyRecord {
            temp_valley: None,
            temp_mountain: Some(20.0),
            ..record(9)
        }];
        assert_eq!(temp_diff_mountain_valley(&records), None);
    }

    #[test]
    fn test_missing_wind_is_not_kiteable() {
        let records = vec![
            HourlyRecord {
                wind_speed: None,
                wind_direction: Some(190.0),
                ..record(12)
            },
            HourlyRecord {
                wind_speed: Some(15.0),
                wind_direction: None,
                ..record(13)
            },
        ];
        assert_eq!(kiteable_hour_count(&records), 0);
    }
}
