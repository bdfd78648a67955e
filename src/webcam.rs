//! Webcam visibility check
//!
//! Haze or fog over the lake makes the snapshot dark and flat. The snapshot
//! is converted to grayscale and its mean luminance is compared against a
//! fixed threshold.

use crate::config::WebcamConfig;
use crate::{KiteError, Result};
use reqwest_middleware::ClientWithMiddleware;
use tokio::task;
use tracing::{debug, info, instrument};

/// Mean luminance (0-255) a snapshot must exceed to count as clear
pub const CLEAR_LUMINANCE_THRESHOLD: f64 = 100.0;

/// Fetch the snapshot and decide whether the view is clear
#[instrument(skip_all, fields(url = %config.url))]
pub async fn fetch_webcam_clear(
    client: &ClientWithMiddleware,
    config: &WebcamConfig,
) -> Result<bool> {
    let bytes = client
        .get(&config.url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    debug!("Downloaded webcam snapshot of {} bytes", bytes.len());

    // Decoding a full-size JPEG is CPU bound
    let brightness = task::spawn_blocking(move || mean_luminance(&bytes))
        .await
        .map_err(|e| KiteError::image(format!("Snapshot analysis task failed: {e}")))??;

    let clear = is_clear(brightness);
    info!("Webcam brightness {:.1} -> clear: {}", brightness, clear);
    Ok(clear)
}

/// Mean grayscale luminance of an encoded image
///
/// Each pixel is reduced with the ITU-R 601-2 luma weights in 16-bit fixed
/// point, rounded to the nearest integer level.
pub fn mean_luminance(bytes: &[u8]) -> Result<f64> {
    let rgb = image::load_from_memory(bytes)?.to_rgb8();
    let pixels = u64::from(rgb.width()) * u64::from(rgb.height());
    if pixels == 0 {
        return Err(KiteError::image("Snapshot has no pixels"));
    }

    let total: u64 = rgb.pixels().map(|p| u64::from(luma_601(p.0))).sum();
    Ok(total as f64 / pixels as f64)
}

/// 0.299 R + 0.587 G + 0.114 B
fn luma_601([r, g, b]: [u8; 3]) -> u8 {
    let weighted = u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000;
    (weighted >> 16) as u8
}

#[must_use]
pub fn is_clear(mean_luminance: f64) -> bool {
    mean_luminance > CLEAR_LUMINANCE_THRESHOLD
}
