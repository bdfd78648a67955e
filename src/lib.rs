//! `KiteForecast` - Daily kite-surfing go/no-go estimates for Reschensee
//!
//! This library combines an hourly weather forecast, a mountain/valley
//! temperature comparison, a pressure gradient between two stations and a
//! webcam visibility check into a per-day score and recommendation.

pub mod config;
pub mod error;
pub mod kiting;
pub mod models;
pub mod report;
pub mod sources;
pub mod stations;
pub mod weather;
pub mod web;
pub mod webcam;

// Re-export core types for public API
pub use config::KiteConfig;
pub use error::KiteError;
pub use kiting::{DailyMetrics, KiteForecastService, KiteReport, KiteStatus};
pub use models::{Location, PressureReading, PressureStation};
pub use sources::{ConditionsProvider, HttpConditionsProvider, SourceOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, KiteError>;
