//! Data models for the `KiteForecast` application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and metadata
//! - Weather: Hourly valley samples
//! - Forecast: Valley forecast and mountain temperature series
//! - Station: Barometric pressure stations and their readings

pub mod forecast;
pub mod location;
pub mod station;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{MountainSeries, ValleyForecast};
pub use location::Location;
pub use station::{PressureReading, PressureStation, pressure_differential};
pub use weather::HourlySample;
