//! Shared fixtures for integration tests

#![allow(dead_code)]

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use kiteforecast::KiteConfig;
use serde_json::{Value, json};
use std::io::Cursor;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const VALLEY_FIELDS: &str = "windspeed_10m,winddirection_10m,cloudcover,temperature_2m";

/// Config pointing every source at the mock server, without retries
pub fn mock_config(server: &MockServer) -> KiteConfig {
    let mut config = KiteConfig::default();
    config.forecast.base_url = server.uri();
    config.pressure.base_url = format!("{}/de/wetter/", server.uri());
    config.webcam.url = format!("{}/webcam/webcam.jpg", server.uri());
    config.http.max_retries = 0;
    config.http.timeout_seconds = 5;
    config
}

fn day_times() -> Vec<String> {
    (0..24).map(|h| format!("2024-06-01T{h:02}:00")).collect()
}

/// One day of valley data: clear morning, six kiteable afternoon hours
pub fn valley_body() -> Value {
    let wind: Vec<f64> = (0..24).map(|h| if (11..=16).contains(&h) { 14.0 } else { 3.0 }).collect();
    json!({
        "latitude": 46.84,
        "longitude": 10.5,
        "timezone": "Europe/Berlin",
        "hourly": {
            "time": day_times(),
            "windspeed_10m": wind,
            "winddirection_10m": vec![190.0; 24],
            "cloudcover": vec![10.0; 24],
            "temperature_2m": vec![14.0; 24],
        }
    })
}

/// Mountain temperatures 7 degrees above the valley
pub fn mountain_body() -> Value {
    json!({
        "latitude": 46.8,
        "longitude": 10.55,
        "timezone": "Europe/Berlin",
        "hourly": {
            "time": day_times(),
            "temperature_2m": vec![21.0; 24],
        }
    })
}

pub fn station_page(pressure: &str) -> String {
    format!(
        "<html><body><table>\
         <tr><td>Temperatur</td><td>17.5 °C</td></tr>\
         <tr><td>Luftdruck</td><td>{pressure} hPa</td></tr>\
         </table></body></html>"
    )
}

pub fn jpeg(value: u8) -> Vec<u8> {
    let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 48, Luma([value])));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Jpeg).unwrap();
    buffer.into_inner()
}

pub async fn mount_valley(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("hourly", VALLEY_FIELDS))
        .respond_with(response)
        .mount(server)
        .await;
}

pub async fn mount_mountain(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("hourly", "temperature_2m"))
        .respond_with(response)
        .mount(server)
        .await;
}

pub async fn mount_station(server: &MockServer, land: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/de/wetter/stadt.asp"))
        .and(query_param("land", land))
        .respond_with(response)
        .mount(server)
        .await;
}

pub async fn mount_webcam(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/webcam/webcam.jpg"))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Every source answers successfully
pub async fn mount_all_sources(server: &MockServer) {
    mount_valley(server, ResponseTemplate::new(200).set_body_json(valley_body())).await;
    mount_mountain(server, ResponseTemplate::new(200).set_body_json(mountain_body())).await;
    mount_station(server, "IT", ResponseTemplate::new(200).set_body_string(station_page("1016.0"))).await;
    mount_station(server, "AT", ResponseTemplate::new(200).set_body_string(station_page("1013.5"))).await;
    mount_webcam(server, ResponseTemplate::new(200).set_body_bytes(jpeg(200))).await;
}
