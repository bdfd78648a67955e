//! Barometric pressure scraper for weather-portal station pages
//!
//! The portal has no API. The current pressure is printed as plain text next
//! to a local-language label ("Luftdruck"), so the page is split into text
//! nodes and the first decimal that looks like a pressure value near the
//! label is taken.

use crate::config::PressureConfig;
use crate::models::PressureStation;
use crate::{KiteError, Result};
use regex::Regex;
use reqwest_middleware::ClientWithMiddleware;
use std::sync::LazyLock;
use tracing::{debug, info, instrument};

/// Text nodes after the labelled one that may still hold the value (table cells)
const NEARBY_TEXT_NODES: usize = 4;

static TEXT_NODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">([^<>]+)<").expect("text node pattern is valid"));

static PRESSURE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{3,4}\.\d)").expect("pressure pattern is valid"));

/// Build the station page URL: base URL with the station path appended verbatim
#[must_use]
pub fn station_url(config: &PressureConfig, station: &PressureStation) -> String {
    format!("{}{}", config.base_url, station.path)
}

/// Fetch the current pressure in hPa for one station
#[instrument(skip(client, config), fields(station = %station.name))]
pub async fn fetch_station_pressure(
    client: &ClientWithMiddleware,
    config: &PressureConfig,
    station: &PressureStation,
) -> Result<f64> {
    let url = station_url(config, station);
    debug!("Station page URL: {}", url);

    let html = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let pressure = extract_pressure(&html, &config.keyword).ok_or_else(|| {
        KiteError::not_found(format!(
            "No '{}' value found on the page for {}",
            config.keyword, station.name
        ))
    })?;

    info!("{} pressure: {:.1} hPa", station.name, pressure);
    Ok(pressure)
}

/// Extract the pressure value from a station page
///
/// Looks at the first text node containing `keyword` and, if that node holds
/// no value, at the few text nodes following it.
#[must_use]
pub fn extract_pressure(html: &str, keyword: &str) -> Option<f64> {
    let nodes: Vec<&str> = TEXT_NODE
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|text| !text.is_empty())
        .collect();

    let start = nodes.iter().position(|text| text.contains(keyword))?;

    nodes
        .iter()
        .skip(start)
        .take(NEARBY_TEXT_NODES + 1)
        .find_map(|text| PRESSURE_VALUE.captures(text))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
