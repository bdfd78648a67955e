//! `OpenMeteo` hourly forecast client
//!
//! The valley request pulls wind, cloud cover and temperature for the whole
//! forecast horizon; the mountain request only pulls temperature at the
//! configured elevation. Timestamps come back as local wall-clock times in the
//! requested timezone and are kept naive.

use crate::config::ForecastConfig;
use crate::models::{HourlySample, Location, MountainSeries, ValleyForecast};
use crate::{KiteError, Result};
use chrono::NaiveDateTime;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

const VALLEY_HOURLY_FIELDS: &str = "windspeed_10m,winddirection_10m,cloudcover,temperature_2m";
const MOUNTAIN_HOURLY_FIELDS: &str = "temperature_2m";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Forecast response from `OpenMeteo` API
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub hourly: Option<HourlyData>,
}

/// Hourly weather data from `OpenMeteo`; entries may be null
#[derive(Debug, Deserialize)]
pub struct HourlyData {
    pub time: Vec<String>,
    #[serde(rename = "windspeed_10m", alias = "wind_speed_10m")]
    pub wind_speed: Option<Vec<Option<f64>>>,
    #[serde(rename = "winddirection_10m", alias = "wind_direction_10m")]
    pub wind_direction: Option<Vec<Option<f64>>>,
    #[serde(rename = "cloudcover", alias = "cloud_cover")]
    pub cloud_cover: Option<Vec<Option<f64>>>,
    #[serde(rename = "temperature_2m")]
    pub temperature: Option<Vec<Option<f64>>>,
}

/// Build the valley request URL
pub fn valley_url(config: &ForecastConfig, location: &Location) -> Result<Url> {
    let mut params = base_params(config, location, config.valley_days);
    params.push(("hourly", VALLEY_HOURLY_FIELDS.to_string()));
    params.push(("wind_speed_unit", config.wind_speed_unit.clone()));
    forecast_url(config, &params)
}

/// Build the mountain request URL
pub fn mountain_url(config: &ForecastConfig, location: &Location) -> Result<Url> {
    let mut params = base_params(config, location, config.mountain_days);
    if let Some(elevation) = location.elevation {
        params.push(("elevation", elevation.to_string()));
    }
    params.push(("hourly", MOUNTAIN_HOURLY_FIELDS.to_string()));
    forecast_url(config, &params)
}

fn base_params(
    config: &ForecastConfig,
    location: &Location,
    days: u32,
) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", location.latitude.to_string()),
        ("longitude", location.longitude.to_string()),
        ("forecast_days", days.to_string()),
        ("timezone", config.timezone.clone()),
    ]
}

fn forecast_url(config: &ForecastConfig, params: &[(&'static str, String)]) -> Result<Url> {
    let endpoint = format!("{}/forecast", config.base_url.trim_end_matches('/'));
    Url::parse_with_params(&endpoint, params)
        .map_err(|e| KiteError::config(format!("Invalid forecast URL '{endpoint}': {e}")))
}

async fn get_forecast(client: &ClientWithMiddleware, url: Url) -> Result<ForecastResponse> {
    debug!("OpenMeteo API request URL: {}", url);
    let start_time = Instant::now();

    let response = client.get(url).send().await?.error_for_status()?;
    let forecast: ForecastResponse = response.json().await?;

    let duration = start_time.elapsed();
    if duration.as_secs() > 5 {
        warn!("Slow API response detected: {:.3}s", duration.as_secs_f64());
    }
    Ok(forecast)
}

/// Fetch the hourly valley forecast for the configured horizon
#[instrument(skip(client, config), fields(location = %location.name))]
pub async fn fetch_valley_forecast(
    client: &ClientWithMiddleware,
    config: &ForecastConfig,
    location: &Location,
) -> Result<ValleyForecast> {
    let url = valley_url(config, location)?;
    let response = get_forecast(client, url).await?;
    let forecast = parse_valley(response, location)?;
    info!("Retrieved {} valley forecast hours", forecast.hours.len());
    Ok(forecast)
}

/// Fetch hourly mountain temperatures
#[instrument(skip(client, config), fields(location = %location.name))]
pub async fn fetch_mountain_temperatures(
    client: &ClientWithMiddleware,
    config: &ForecastConfig,
    location: &Location,
) -> Result<MountainSeries> {
    let url = mountain_url(config, location)?;
    let response = get_forecast(client, url).await?;
    let series = parse_mountain(response)?;
    info!("Retrieved {} mountain temperature hours", series.len());
    Ok(series)
}

/// Convert a valley response into ordered hourly samples
///
/// A null entry only blanks that one value; the hour itself is kept so the
/// remaining values still count. An empty result is an error because the
/// valley forecast is the backbone of the whole run.
pub fn parse_valley(response: ForecastResponse, location: &Location) -> Result<ValleyForecast> {
    let hourly = response
        .hourly
        .ok_or_else(|| KiteError::parse("Valley forecast response has no hourly block"))?;
    let len = hourly.time.len();

    let wind_speed = required_series(hourly.wind_speed, "windspeed_10m", len)?;
    let wind_direction = required_series(hourly.wind_direction, "winddirection_10m", len)?;
    let cloud_cover = required_series(hourly.cloud_cover, "cloudcover", len)?;
    let temperature = required_series(hourly.temperature, "temperature_2m", len)?;

    let mut hours = Vec::with_capacity(len);
    for (i, time) in hourly.time.iter().enumerate() {
        let sample = HourlySample {
            timestamp: parse_timestamp(time)?,
            wind_speed: wind_speed[i],
            wind_direction: wind_direction[i],
            cloud_cover: cloud_cover[i],
            temperature: temperature[i],
        };
        if !sample.is_complete() {
            debug!("Valley hour {} has missing values", time);
        }
        hours.push(sample);
    }

    if hours.is_empty() {
        return Err(KiteError::not_found("Valley forecast contains no hours"));
    }

    Ok(ValleyForecast::new(location.clone(), hours))
}

/// Convert a mountain response into a timestamp-keyed temperature series
pub fn parse_mountain(response: ForecastResponse) -> Result<MountainSeries> {
    let hourly = response
        .hourly
        .ok_or_else(|| KiteError::parse("Mountain forecast response has no hourly block"))?;
    let temperatures = hourly
        .temperature
        .ok_or_else(|| KiteError::parse("Mountain forecast response has no temperature_2m"))?;

    let mut series = MountainSeries::new();
    for (time, temperature) in hourly.time.iter().zip(temperatures) {
        if let Some(temperature) = temperature {
            series.insert(parse_timestamp(time)?, temperature);
        }
    }
    Ok(series)
}

fn required_series(
    values: Option<Vec<Option<f64>>>,
    name: &str,
    len: usize,
) -> Result<Vec<Option<f64>>> {
    let values =
        values.ok_or_else(|| KiteError::parse(format!("Forecast response has no {name}")))?;
    if values.len() < len {
        return Err(KiteError::parse(format!(
            "{name} has {} values for {len} timestamps",
            values.len()
        )));
    }
    Ok(values)
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|e| KiteError::parse(format!("Invalid forecast timestamp '{value}': {e}")))
}
