//! Weather forecast sources

pub mod open_meteo;

pub use open_meteo::{fetch_mountain_temperatures, fetch_valley_forecast};
