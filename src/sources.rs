//! Upstream data sources
//!
//! Every source except the valley forecast is optional. Failures of optional
//! sources are converted into a [`SourceOutcome`] carrying the diagnostic, so
//! no error crosses into the scoring code.

use crate::config::{HttpConfig, KiteConfig};
use crate::models::{MountainSeries, PressureStation, ValleyForecast};
use crate::{Result, stations, weather, webcam};
use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::warn;

/// Identifies which upstream produced a value or a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SourceKind {
    ValleyForecast,
    MountainForecast,
    Pressure(String),
    Webcam,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::ValleyForecast => write!(f, "Valley forecast"),
            SourceKind::MountainForecast => write!(f, "Mountain forecast"),
            SourceKind::Pressure(station) => write!(f, "Pressure ({station})"),
            SourceKind::Webcam => write!(f, "Webcam"),
        }
    }
}

/// Warning attached to an unavailable source, shown next to the affected output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceDiagnostic {
    pub source: SourceKind,
    pub message: String,
}

impl fmt::Display for SourceDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} unavailable: {}", self.source, self.message)
    }
}

/// Value-or-absence result of an optional source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOutcome<T> {
    pub source: SourceKind,
    pub value: Option<T>,
    pub diagnostic: Option<String>,
}

impl<T> SourceOutcome<T> {
    #[must_use]
    pub fn available(source: SourceKind, value: T) -> Self {
        Self {
            source,
            value: Some(value),
            diagnostic: None,
        }
    }

    #[must_use]
    pub fn unavailable<S: Into<String>>(source: SourceKind, diagnostic: S) -> Self {
        Self {
            source,
            value: None,
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Convert an adapter result at the call boundary, logging the failure
    #[must_use]
    pub fn from_result(source: SourceKind, result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::available(source, value),
            Err(e) => {
                warn!(source = %source, error = %e, "Source unavailable, continuing with degraded data");
                Self::unavailable(source, e.to_string())
            }
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.value.is_some()
    }

    #[must_use]
    pub fn to_diagnostic(&self) -> Option<SourceDiagnostic> {
        self.diagnostic.as_ref().map(|message| SourceDiagnostic {
            source: self.source.clone(),
            message: message.clone(),
        })
    }
}

/// Seam between the forecast service and the upstream sources
#[async_trait]
pub trait ConditionsProvider: Send + Sync {
    /// Hourly valley forecast; mandatory
    async fn valley_forecast(&self) -> Result<ValleyForecast>;

    /// Hourly mountain temperatures
    async fn mountain_temperatures(&self) -> Result<MountainSeries>;

    /// Current barometric pressure in hPa
    async fn station_pressure(&self, station: &PressureStation) -> Result<f64>;

    /// Whether the webcam snapshot is bright enough to count as clear
    async fn webcam_clear(&self) -> Result<bool>;
}

/// Build the shared HTTP client with timeout, user agent and transient retries
pub fn build_http_client(config: &HttpConfig) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(config.user_agent.as_str())
        .build()?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Production provider talking to Open-Meteo, the weather portal and the webcam
pub struct HttpConditionsProvider {
    client: ClientWithMiddleware,
    config: KiteConfig,
}

impl HttpConditionsProvider {
    pub fn new(config: KiteConfig) -> Result<Self> {
        let client = build_http_client(&config.http)?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ConditionsProvider for HttpConditionsProvider {
    async fn valley_forecast(&self) -> Result<ValleyForecast> {
        weather::fetch_valley_forecast(&self.client, &self.config.forecast, &self.config.spot.valley)
            .await
    }

    async fn mountain_temperatures(&self) -> Result<MountainSeries> {
        weather::fetch_mountain_temperatures(
            &self.client,
            &self.config.forecast,
            &self.config.spot.mountain,
        )
        .await
    }

    async fn station_pressure(&self, station: &PressureStation) -> Result<f64> {
        stations::fetch_station_pressure(&self.client, &self.config.pressure, station).await
    }

    async fn webcam_clear(&self) -> Result<bool> {
        webcam::fetch_webcam_clear(&self.client, &self.config.webcam).await
    }
}
