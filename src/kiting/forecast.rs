//! Kite forecast service
//!
//! Runs the whole pipeline once: fetch every source concurrently, join and
//! score the valley hours, and collect everything the presenters need into a
//! [`KiteReport`].

use super::day_evaluator::{evaluate_days, join_hourly};
use super::scoring::{DailyMetrics, KiteStatus, SharedConditions};
use crate::config::KiteConfig;
use crate::models::{Location, MountainSeries, PressureReading, PressureStation, pressure_differential};
use crate::sources::{ConditionsProvider, SourceDiagnostic, SourceKind, SourceOutcome};
use crate::{KiteError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, instrument};

/// Result of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct KiteReport {
    pub spot: Location,
    pub generated_at: DateTime<Utc>,
    /// One entry per forecast date, in date order
    pub days: Vec<DailyMetrics>,
    pub south_pressure: PressureReading,
    pub north_pressure: PressureReading,
    pub pressure_diff: Option<f64>,
    pub webcam_clear: Option<bool>,
    /// Open-Meteo unit the wind speeds were requested in
    pub wind_speed_unit: String,
    /// One entry per source that could not be read
    pub diagnostics: Vec<SourceDiagnostic>,
}

impl KiteReport {
    /// Best day by score, first one wins on ties
    #[must_use]
    pub fn best_day(&self) -> Option<&DailyMetrics> {
        self.days
            .iter()
            .reduce(|best, day| if day.score > best.score { day } else { best })
    }

    #[must_use]
    pub fn count_with_status(&self, status: KiteStatus) -> usize {
        self.days.iter().filter(|d| d.status == status).count()
    }
}

/// Kite forecast service
pub struct KiteForecastService<P> {
    provider: P,
    config: KiteConfig,
}

impl<P: ConditionsProvider> KiteForecastService<P> {
    pub fn new(provider: P, config: KiteConfig) -> Self {
        Self { provider, config }
    }

    /// Run the pipeline once
    ///
    /// Fails only when the valley forecast is unavailable; every other source
    /// degrades to an absent value plus a diagnostic.
    #[instrument(skip(self), fields(spot = %self.config.spot.valley.name))]
    pub async fn generate_report(&self) -> Result<KiteReport> {
        let south = &self.config.pressure.south;
        let north = &self.config.pressure.north;

        let (valley, mountain, south_hpa, north_hpa, webcam) = tokio::join!(
            self.provider.valley_forecast(),
            self.provider.mountain_temperatures(),
            self.provider.station_pressure(south),
            self.provider.station_pressure(north),
            self.provider.webcam_clear(),
        );

        let valley = valley.map_err(|e| {
            error!(source = %SourceKind::ValleyForecast, error = %e, "Mandatory source unavailable, stopping");
            KiteError::forecast_unavailable(e.to_string())
        })?;
        if valley.is_empty() {
            error!(source = %SourceKind::ValleyForecast, "Forecast contained no hours, stopping");
            return Err(KiteError::forecast_unavailable("forecast contained no hours"));
        }

        let mountain = SourceOutcome::from_result(SourceKind::MountainForecast, mountain);
        let south_hpa = SourceOutcome::from_result(pressure_kind(south), south_hpa);
        let north_hpa = SourceOutcome::from_result(pressure_kind(north), north_hpa);
        let webcam = SourceOutcome::from_result(SourceKind::Webcam, webcam);

        let diagnostics: Vec<SourceDiagnostic> = [
            mountain.to_diagnostic(),
            south_hpa.to_diagnostic(),
            north_hpa.to_diagnostic(),
            webcam.to_diagnostic(),
        ]
        .into_iter()
        .flatten()
        .collect();

        let south_pressure = PressureReading {
            station: south.clone(),
            pressure_hpa: south_hpa.value,
        };
        let north_pressure = PressureReading {
            station: north.clone(),
            pressure_hpa: north_hpa.value,
        };
        let shared = SharedConditions {
            pressure_diff: pressure_differential(&south_pressure, &north_pressure),
            webcam_clear: webcam.value,
        };

        let mountain = mountain.value.unwrap_or_else(MountainSeries::new);
        let days = evaluate_days(join_hourly(&valley, &mountain), &shared);

        let report = KiteReport {
            spot: valley.location,
            generated_at: Utc::now(),
            days,
            south_pressure,
            north_pressure,
            pressure_diff: shared.pressure_diff,
            webcam_clear: shared.webcam_clear,
            wind_speed_unit: self.config.forecast.wind_speed_unit.clone(),
            diagnostics,
        };

        info!(
            "Evaluated {} days ({} Go, {} Risky, {} No Go), {} sources unavailable",
            report.days.len(),
            report.count_with_status(KiteStatus::Go),
            report.count_with_status(KiteStatus::Risky),
            report.count_with_status(KiteStatus::NoGo),
            report.diagnostics.len()
        );
        Ok(report)
    }
}

fn pressure_kind(station: &PressureStation) -> SourceKind {
    SourceKind::Pressure(station.name.clone())
}
