//! Additive day score and Go / Risky / No Go status

use super::day_evaluator::DayObservations;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Score at or above which a day can be Go (webcam permitting)
pub const GO_THRESHOLD: i32 = 50;
/// Score at or above which a day is at least Risky
pub const RISKY_THRESHOLD: i32 = 20;

/// Recommendation for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KiteStatus {
    Go,
    Risky,
    NoGo,
}

impl KiteStatus {
    #[must_use]
    pub fn emoji(&self) -> &'static str {
        match self {
            KiteStatus::Go => "✅",
            KiteStatus::Risky => "⚠️",
            KiteStatus::NoGo => "❌",
        }
    }

    /// CSS class used by the HTML page
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        match self {
            KiteStatus::Go => "go",
            KiteStatus::Risky => "risky",
            KiteStatus::NoGo => "nogo",
        }
    }
}

impl fmt::Display for KiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KiteStatus::Go => write!(f, "Go"),
            KiteStatus::Risky => write!(f, "Risky"),
            KiteStatus::NoGo => write!(f, "No Go"),
        }
    }
}

/// Readings that describe "now" and are shared by every forecast day
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SharedConditions {
    /// South minus north station pressure in hPa
    pub pressure_diff: Option<f64>,
    pub webcam_clear: Option<bool>,
}

/// Everything shown for one forecast day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMetrics {
    pub date: NaiveDate,
    /// Mean cloud cover 06:00-10:59
    pub cloud_morning_avg: Option<f64>,
    /// Mean mountain minus mean valley temperature 09:00-10:59
    pub temp_diff_mountain_valley: Option<f64>,
    pub kiteable_hour_count: usize,
    pub pressure_diff: Option<f64>,
    pub webcam_clear: Option<bool>,
    pub score: i32,
    pub status: KiteStatus,
}

impl DailyMetrics {
    /// Score a day and fix its status; the result is never changed afterwards
    #[must_use]
    pub fn evaluate(
        date: NaiveDate,
        observations: &DayObservations,
        shared: &SharedConditions,
    ) -> Self {
        let score = score_day(observations, shared.pressure_diff);
        Self {
            date,
            cloud_morning_avg: observations.cloud_morning_avg,
            temp_diff_mountain_valley: observations.temp_diff_mountain_valley,
            kiteable_hour_count: observations.kiteable_hour_count,
            pressure_diff: shared.pressure_diff,
            webcam_clear: shared.webcam_clear,
            score,
            status: derive_status(score, shared.webcam_clear),
        }
    }
}

/// Clear mornings let the valley heat up; missing cloud data counts as overcast
#[must_use]
pub fn cloud_factor(cloud_morning_avg: Option<f64>) -> i32 {
    match cloud_morning_avg {
        Some(avg) if avg < 30.0 => 30,
        Some(avg) if avg < 60.0 => 10,
        _ => -10,
    }
}

/// A strongly negative south-north gradient means north foehn, which kills the thermal
#[must_use]
pub fn pressure_factor(pressure_diff: Option<f64>) -> i32 {
    match pressure_diff {
        None => 0,
        Some(diff) if diff < -6.0 => -30,
        Some(diff) if diff < -4.0 => -10,
        Some(_) => 10,
    }
}

#[must_use]
pub fn temp_diff_factor(temp_diff: Option<f64>) -> i32 {
    match temp_diff {
        Some(diff) if diff >= 6.0 => 15,
        Some(diff) if diff >= 3.0 => 5,
        _ => -5,
    }
}

#[must_use]
pub fn wind_hours_factor(kiteable_hour_count: usize) -> i32 {
    i32::try_from(kiteable_hour_count)
        .unwrap_or(i32::MAX)
        .saturating_mul(10)
}

/// Sum of all factors for one day
#[must_use]
pub fn score_day(observations: &DayObservations, pressure_diff: Option<f64>) -> i32 {
    cloud_factor(observations.cloud_morning_avg)
        + pressure_factor(pressure_diff)
        + temp_diff_factor(observations.temp_diff_mountain_valley)
        + wind_hours_factor(observations.kiteable_hour_count)
}

/// Go requires a clear webcam; a high score without one is only Risky
#[must_use]
pub fn derive_status(score: i32, webcam_clear: Option<bool>) -> KiteStatus {
    if score >= GO_THRESHOLD && webcam_clear == Some(true) {
        KiteStatus::Go
    } else if score >= RISKY_THRESHOLD {
        KiteStatus::Risky
    } else {
        KiteStatus::NoGo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn observations(cloud: Option<f64>, temp_diff: Option<f64>, hours: usize) -> DayObservations {
        DayObservations {
            cloud_morning_avg: cloud,
            temp_diff_mountain_valley: temp_diff,
            kiteable_hour_count: hours,
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 14).unwrap()
    }

    #[rstest]
    #[case::clear(Some(0.0), 30)]
    #[case::almost_partly(Some(29.9), 30)]
    #[case::partly(Some(30.0), 10)]
    #[case::almost_overcast(Some(59.9), 10)]
    #[case::overcast(Some(60.0), -10)]
    #[case::missing(None, -10)]
    fn test_cloud_factor(#[case] cloud: Option<f64>, #[case] expected: i32) {
        assert_eq!(cloud_factor(cloud), expected);
    }

    #[rstest]
    #[case::missing(None, 0)]
    #[case::strong_north(Some(-8.0), -30)]
    #[case::at_minus_six(Some(-6.0), -10)]
    #[case::moderate_north(Some(-5.0), -10)]
    #[case::at_minus_four(Some(-4.0), 10)]
    #[case::south(Some(3.0), 10)]
    fn test_pressure_factor(#[case] diff: Option<f64>, #[case] expected: i32) {
        assert_eq!(pressure_factor(diff), expected);
    }

    #[rstest]
    #[case::strong(Some(7.0), 15)]
    #[case::at_six(Some(6.0), 15)]
    #[case::weak(Some(3.0), 5)]
    #[case::flat(Some(2.9), -5)]
    #[case::inverted(Some(-4.0), -5)]
    #[case::missing(None, -5)]
    fn test_temp_diff_factor(#[case] diff: Option<f64>, #[case] expected: i32) {
        assert_eq!(temp_diff_factor(diff), expected);
    }

    #[test]
    fn test_wind_hours_factor_uncapped() {
        assert_eq!(wind_hours_factor(0), 0);
        assert_eq!(wind_hours_factor(6), 60);
        assert_eq!(wind_hours_factor(24), 240);
        assert_eq!(wind_hours_factor(usize::MAX), i32::MAX);
    }

    #[rstest]
    #[case::a_go(observations(Some(20.0), Some(7.0), 2), Some(-2.0), Some(true), 75, KiteStatus::Go)]
    #[case::b_hazy(observations(Some(20.0), Some(7.0), 2), Some(-2.0), Some(false), 75, KiteStatus::Risky)]
    #[case::c_foehn(observations(Some(70.0), None, 0), Some(-8.0), Some(true), -45, KiteStatus::NoGo)]
    #[case::e_degraded(observations(Some(10.0), None, 3), None, None, 55, KiteStatus::Risky)]
    fn test_scenarios(
        #[case] obs: DayObservations,
        #[case] pressure_diff: Option<f64>,
        #[case] webcam_clear: Option<bool>,
        #[case] expected_score: i32,
        #[case] expected_status: KiteStatus,
    ) {
        let shared = SharedConditions {
            pressure_diff,
            webcam_clear,
        };
        let metrics = DailyMetrics::evaluate(day(), &obs, &shared);
        assert_eq!(metrics.score, expected_score);
        assert_eq!(metrics.status, expected_status);
        assert_eq!(metrics.pressure_diff, pressure_diff);
        assert_eq!(metrics.webcam_clear, webcam_clear);
    }

    #[rstest]
    #[case(50, Some(true), KiteStatus::Go)]
    #[case(49, Some(true), KiteStatus::Risky)]
    #[case(120, Some(false), KiteStatus::Risky)]
    #[case(120, None, KiteStatus::Risky)]
    #[case(20, Some(true), KiteStatus::Risky)]
    #[case(19, Some(true), KiteStatus::NoGo)]
    #[case(-45, None, KiteStatus::NoGo)]
    fn test_derive_status(
        #[case] score: i32,
        #[case] webcam_clear: Option<bool>,
        #[case] expected: KiteStatus,
    ) {
        assert_eq!(derive_status(score, webcam_clear), expected);
    }

    #[test]
    fn test_go_never_without_clear_webcam() {
        for score in -100..=300 {
            for webcam in [None, Some(false)] {
                assert_ne!(derive_status(score, webcam), KiteStatus::Go);
            }
        }
    }

    #[test]
    fn test_status_display() {
        assert_eq!(KiteStatus::Go.to_string(), "Go");
        assert_eq!(KiteStatus::NoGo.to_string(), "No Go");
        assert_eq!(KiteStatus::Risky.css_class(), "risky");
    }
}
