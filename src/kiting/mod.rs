//! Kite module
//!
//! This module turns the upstream data into per-day recommendations:
//! - Wind window: which forecast hours count as kiteable
//! - Day evaluation: joining valley and mountain hours, grouping by date, day metrics
//! - Scoring: the additive score and the Go / Risky / No Go status
//! - Forecast service: runs the whole pipeline once and builds the report

pub mod day_evaluator;
pub mod forecast;
pub mod scoring;
pub mod wind_analysis;

// Re-export commonly used types from submodules
pub use day_evaluator::{
    DayObservations, DayRecords, HourlyRecord, evaluate_days, group_by_day, join_hourly,
};
pub use forecast::{KiteForecastService, KiteReport};
pub use scoring::{DailyMetrics, KiteStatus, SharedConditions, derive_status, score_day};
pub use wind_analysis::{KITEABLE_WINDOW, KiteableWindow};
