//! HTML presenter served over HTTP
//!
//! `GET /` runs the pipeline once per request and renders the same content
//! as the terminal report through the embedded tera templates. A fatal
//! pipeline error is rendered as an error page with status 503.

use crate::config::WebConfig;
use crate::kiting::{DailyMetrics, KITEABLE_WINDOW, KiteForecastService, KiteReport};
use crate::report::{format_optional, format_webcam_short, pressure_difference_line, webcam_verdict};
use crate::sources::ConditionsProvider;
use crate::{KiteError, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Router, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tera::{Context, Tera};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 260.0;
const CHART_PADDING: f64 = 30.0;

mod embedded {
    pub const BASE: &str = include_str!("../templates/base.html");
    pub const REPORT: &str = include_str!("../templates/report.html");
    pub const ERROR: &str = include_str!("../templates/error.html");
}

/// Compiled page templates
#[derive(Debug, Clone)]
pub struct PageRenderer {
    tera: Arc<Tera>,
}

impl PageRenderer {
    /// Compile the embedded templates with HTML autoescaping
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        // added together so `extends "base.html"` resolves
        tera.add_raw_templates(vec![
            ("base.html", embedded::BASE),
            ("report.html", embedded::REPORT),
            ("error.html", embedded::ERROR),
        ])?;
        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// Render a report as a standalone HTML page
    pub fn render_report(&self, report: &KiteReport) -> Result<String> {
        let context = Context::from_serialize(ReportPage::from_report(report))?;
        Ok(self.tera.render("report.html", &context)?)
    }

    /// Render the page shown when no forecast could be produced
    pub fn render_error(&self, error: &KiteError) -> Result<String> {
        let mut context = Context::new();
        context.insert("message", &error.user_message());
        Ok(self.tera.render("error.html", &context)?)
    }
}

#[derive(Debug, Serialize)]
struct ReportPage {
    spot_name: String,
    coordinates: String,
    generated_at: String,
    warnings: Vec<String>,
    days: Vec<DayRow>,
    chart: ScoreChart,
    pressures: Vec<PressureRow>,
    pressure_difference: String,
    webcam: &'static str,
    kiteable_window: String,
}

impl ReportPage {
    fn from_report(report: &KiteReport) -> Self {
        Self {
            spot_name: report.spot.name.clone(),
            coordinates: report.spot.format_coordinates(),
            generated_at: report.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            warnings: report.diagnostics.iter().map(ToString::to_string).collect(),
            days: report.days.iter().map(DayRow::from_metrics).collect(),
            chart: ScoreChart::layout(&report.days),
            pressures: [&report.south_pressure, &report.north_pressure]
                .into_iter()
                .map(|reading| PressureRow {
                    station: reading.station.name.clone(),
                    value: reading.format_pressure(),
                })
                .collect(),
            pressure_difference: pressure_difference_line(report),
            webcam: webcam_verdict(report.webcam_clear),
            kiteable_window: KITEABLE_WINDOW.describe(&report.wind_speed_unit),
        }
    }
}

#[derive(Debug, Serialize)]
struct DayRow {
    date: String,
    cloud: String,
    temp_diff: String,
    kiteable_hours: usize,
    pressure_diff: String,
    webcam: &'static str,
    score: i32,
    css_class: &'static str,
    emoji: &'static str,
    status: String,
}

impl DayRow {
    fn from_metrics(day: &DailyMetrics) -> Self {
        Self {
            date: day.date.format("%Y-%m-%d").to_string(),
            cloud: format_optional(day.cloud_morning_avg, "%", 0),
            temp_diff: format_optional(day.temp_diff_mountain_valley, "°C", 1),
            kiteable_hours: day.kiteable_hour_count,
            pressure_diff: format_optional(day.pressure_diff, "", 2),
            webcam: format_webcam_short(day.webcam_clear),
            score: day.score,
            css_class: day.status.css_class(),
            emoji: day.status.emoji(),
            status: day.status.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PressureRow {
    station: String,
    value: String,
}

/// SVG geometry for the score chart; negative bars hang below the baseline
#[derive(Debug, Serialize)]
struct ScoreChart {
    width: String,
    height: String,
    left: String,
    right: String,
    baseline: String,
    label_y: String,
    bars: Vec<ScoreBar>,
}

#[derive(Debug, Serialize)]
struct ScoreBar {
    class: &'static str,
    x: String,
    y: String,
    width: String,
    height: String,
    center: String,
    score_y: String,
    score: i32,
    label: String,
}

impl ScoreChart {
    fn layout(days: &[DailyMetrics]) -> Self {
        let max_pos = days.iter().map(|d| d.score.max(0)).max().unwrap_or(0);
        let max_neg = days.iter().map(|d| (-d.score).max(0)).max().unwrap_or(0);
        let range = f64::from((max_pos + max_neg).max(1));

        let plot_height = CHART_HEIGHT - 2.0 * CHART_PADDING;
        let baseline = CHART_PADDING + plot_height * f64::from(max_pos) / range;
        let slot = (CHART_WIDTH - 2.0 * CHART_PADDING) / days.len().max(1) as f64;
        let bar_width = slot * 0.6;

        let bars = days
            .iter()
            .enumerate()
            .map(|(i, day)| {
                let height = plot_height * f64::from(day.score.unsigned_abs()) / range;
                let x = CHART_PADDING + i as f64 * slot + (slot - bar_width) / 2.0;
                let (y, class) = if day.score >= 0 {
                    (baseline - height, "bar-pos")
                } else {
                    (baseline, "bar-neg")
                };
                ScoreBar {
                    class,
                    x: format!("{x:.1}"),
                    y: format!("{y:.1}"),
                    width: format!("{bar_width:.1}"),
                    height: format!("{height:.1}"),
                    center: format!("{:.1}", x + bar_width / 2.0),
                    score_y: format!("{:.1}", (y - 4.0).max(10.0)),
                    score: day.score,
                    label: day.date.format("%d.%m").to_string(),
                }
            })
            .collect();

        Self {
            width: format!("{CHART_WIDTH}"),
            height: format!("{CHART_HEIGHT}"),
            left: format!("{CHART_PADDING}"),
            right: format!("{:.1}", CHART_WIDTH - CHART_PADDING),
            baseline: format!("{baseline:.1}"),
            label_y: format!("{:.1}", CHART_HEIGHT - 8.0),
            bars,
        }
    }
}

struct AppState<P> {
    service: Arc<KiteForecastService<P>>,
    pages: PageRenderer,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            pages: self.pages.clone(),
        }
    }
}

/// Build the router for a forecast service
pub fn router<P>(service: Arc<KiteForecastService<P>>) -> Result<Router>
where
    P: ConditionsProvider + 'static,
{
    let state = AppState {
        service,
        pages: PageRenderer::new()?,
    };
    Ok(Router::new()
        .route("/", get(index::<P>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Serve the HTML page until Ctrl-C
pub async fn run<P>(service: KiteForecastService<P>, config: &WebConfig) -> Result<()>
where
    P: ConditionsProvider + 'static,
{
    let app = router(Arc::new(service))?;
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| KiteError::config(format!("Cannot bind {addr}: {e}")))?;
    info!("Kite forecast page at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Cannot listen for Ctrl-C");
            }
            info!("Shutting down");
        })
        .await?;
    Ok(())
}

async fn index<P: ConditionsProvider>(State(state): State<AppState<P>>) -> Response {
    let (status, page) = match state.service.generate_report().await {
        Ok(report) => (StatusCode::OK, state.pages.render_report(&report)),
        Err(e) => {
            error!(error = %e, "Forecast page failed");
            (StatusCode::SERVICE_UNAVAILABLE, state.pages.render_error(&e))
        }
    };
    match page {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(error = %e, "Page rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.user_message()).into_response()
        }
    }
}

async fn health() -> &'static str {
    "ok"
}
