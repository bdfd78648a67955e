//! Configuration management for `KiteForecast`
//!
//! Handles loading configuration from files and environment variables and
//! validates every setting before the first request goes out. All defaults
//! describe the Reschensee spot.

use crate::KiteError;
use crate::models::{Location, PressureStation};
use anyhow::{Context, Result};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KiteConfig {
    /// Spot geography
    #[serde(default)]
    pub spot: SpotConfig,
    /// Open-Meteo forecast settings
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// Barometric pressure stations
    #[serde(default)]
    pub pressure: PressureConfig,
    /// Webcam snapshot settings
    #[serde(default)]
    pub webcam: WebcamConfig,
    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTML page server settings
    #[serde(default)]
    pub web: WebConfig,
}

/// Valley (lake) and mountain reference points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotConfig {
    #[serde(default = "default_valley")]
    pub valley: Location,
    #[serde(default = "default_mountain")]
    pub mountain: Location,
}

/// Open-Meteo forecast settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Base URL for the forecast API
    #[serde(default = "default_forecast_base_url")]
    pub base_url: String,
    /// Valley forecast horizon
    #[serde(default = "default_valley_days")]
    pub valley_days: u32,
    /// Mountain forecast horizon
    #[serde(default = "default_mountain_days")]
    pub mountain_days: u32,
    /// IANA timezone the hourly timestamps are expressed in
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Open-Meteo wind speed unit (kmh, ms, mph, kn)
    #[serde(default = "default_wind_speed_unit")]
    pub wind_speed_unit: String,
}

/// Weather portal pressure scraping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressureConfig {
    /// Portal base URL; station paths are appended verbatim
    #[serde(default = "default_pressure_base_url")]
    pub base_url: String,
    /// Local-language word labelling the pressure value
    #[serde(default = "default_pressure_keyword")]
    pub keyword: String,
    /// Station south of the main ridge (minuend of the differential)
    #[serde(default = "default_south_station")]
    pub south: PressureStation,
    /// Station north of the main ridge (subtrahend of the differential)
    #[serde(default = "default_north_station")]
    pub north: PressureStation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebcamConfig {
    /// Static JPEG snapshot URL
    #[serde(default = "default_webcam_url")]
    pub url: String,
}

/// HTTP client settings shared by all sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_http_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_valley() -> Location {
    Location::new(46.836, 10.508, "Reschensee".to_string())
}

fn default_mountain() -> Location {
    Location::with_elevation(46.8, 10.55, "Haider Alm".to_string(), 2100.0)
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_valley_days() -> u32 {
    4
}

fn default_mountain_days() -> u32 {
    1
}

fn default_timezone() -> String {
    "Europe/Berlin".to_string()
}

fn default_wind_speed_unit() -> String {
    "kmh".to_string()
}

fn default_pressure_base_url() -> String {
    "https://www.wetterkontor.de/de/wetter/".to_string()
}

fn default_pressure_keyword() -> String {
    "Luftdruck".to_string()
}

fn default_south_station() -> PressureStation {
    PressureStation::new("Bozen", "stadt.asp?land=IT&id=11560")
}

fn default_north_station() -> PressureStation {
    PressureStation::new("Innsbruck", "stadt.asp?land=AT&id=11115")
}

fn default_webcam_url() -> String {
    "https://www.kiteboarding-reschen.eu/webcam/webcam.jpg".to_string()
}

fn default_http_timeout() -> u32 {
    30
}

fn default_http_max_retries() -> u32 {
    2
}

fn default_user_agent() -> String {
    format!("KiteForecast/{}", crate::VERSION)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

impl Default for SpotConfig {
    fn default() -> Self {
        Self {
            valley: default_valley(),
            mountain: default_mountain(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: default_forecast_base_url(),
            valley_days: default_valley_days(),
            mountain_days: default_mountain_days(),
            timezone: default_timezone(),
            wind_speed_unit: default_wind_speed_unit(),
        }
    }
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            base_url: default_pressure_base_url(),
            keyword: default_pressure_keyword(),
            south: default_south_station(),
            north: default_north_station(),
        }
    }
}

impl Default for WebcamConfig {
    fn default() -> Self {
        Self {
            url: default_webcam_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_http_timeout(),
            max_retries: default_http_max_retries(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl KiteConfig {
    /// Load configuration from the given file, or from the default locations when `None`
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let explicit = config_path.is_some();
        let config_file = config_path.or_else(Self::find_config_file);

        if let Some(config_file) = config_file {
            if explicit && !config_file.exists() {
                return Err(KiteError::config(format!(
                    "Config file not found: {}",
                    config_file.display()
                ))
                .into());
            }
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // KITEFORECAST_HTTP__TIMEOUT_SECONDS=10 -> http.timeout_seconds
        builder = builder.add_source(
            Environment::with_prefix("KITEFORECAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: KiteConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kiteforecast").join("config.toml"))
    }

    fn find_config_file() -> Option<PathBuf> {
        Self::get_config_path()
            .filter(|p| p.exists())
            .or_else(|| Some(PathBuf::from("kiteforecast.toml")).filter(|p| p.exists()))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_locations()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_locations(&self) -> Result<()> {
        for location in [&self.spot.valley, &self.spot.mountain] {
            if !(-90.0..=90.0).contains(&location.latitude) {
                return Err(KiteError::config(format!(
                    "Latitude {} of '{}' must be between -90 and 90",
                    location.latitude, location.name
                ))
                .into());
            }
            if !(-180.0..=180.0).contains(&location.longitude) {
                return Err(KiteError::config(format!(
                    "Longitude {} of '{}' must be between -180 and 180",
                    location.longitude, location.name
                ))
                .into());
            }
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        for days in [self.forecast.valley_days, self.forecast.mountain_days] {
            if !(1..=16).contains(&days) {
                return Err(
                    KiteError::config("Forecast days must be between 1 and 16").into(),
                );
            }
        }

        if self.http.timeout_seconds == 0 || self.http.timeout_seconds > 300 {
            return Err(
                KiteError::config("HTTP timeout must be between 1 and 300 seconds").into(),
            );
        }

        if self.http.max_retries > 10 {
            return Err(KiteError::config("HTTP max retries cannot exceed 10").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(KiteError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(KiteError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_units = ["kmh", "ms", "mph", "kn"];
        if !valid_units.contains(&self.forecast.wind_speed_unit.as_str()) {
            return Err(KiteError::config(format!(
                "Invalid wind speed unit '{}'. Must be one of: {}",
                self.forecast.wind_speed_unit,
                valid_units.join(", ")
            ))
            .into());
        }

        if self.forecast.timezone.parse::<Tz>().is_err() {
            return Err(KiteError::config(format!(
                "Unknown timezone '{}'",
                self.forecast.timezone
            ))
            .into());
        }

        for (name, url) in [
            ("forecast.base_url", &self.forecast.base_url),
            ("pressure.base_url", &self.pressure.base_url),
            ("webcam.url", &self.webcam.url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(
                    KiteError::config(format!("{name} must be a valid HTTP or HTTPS URL")).into(),
                );
            }
        }

        if self.pressure.keyword.trim().is_empty() {
            return Err(KiteError::config("Pressure keyword cannot be empty").into());
        }

        for station in [&self.pressure.south, &self.pressure.north] {
            if station.path.trim().is_empty() {
                return Err(KiteError::config(format!(
                    "Pressure station '{}' needs a path",
                    station.name
                ))
                .into());
            }
        }

        Ok(())
    }
}
