//! # Image Transform Pipeline
//!
//! Turns a fetched [`ImageHandle`] into what the image endpoint sends back:
//!
//! ```text
//! raw?  ──yes──▶ original bytes + MIME type
//!   │
//!   no
//!   ▼
//! encode as data URI ──▶ blur (if backgroundBlur) ──▶ caption
//! ```
//!
//! Encoding and blurring are CPU-bound; callers on the async runtime should
//! run [`render`] via `tokio::task::spawn_blocking`.

use std::io::Cursor;
use std::time::Instant;

use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageFormat, imageops::FilterType};
use tracing::debug;

use crate::backend::ImageHandle;
use crate::config::Config;
use crate::datetime;
use crate::error::KioskError;

/// 24-hour caption time keeps seconds (the clock does not).
pub const IMAGE_TIME_FORMAT_24H: &str = "%H:%M:%S";

/// Gaussian sigma for the background blur.
const BLUR_SIGMA: f32 = 20.0;

/// Longest edge of the blurred background before blurring.
const BLUR_MAX_DIM: u32 = 1000;

/// Output of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedImage {
    /// Untouched bytes, for `?raw`
    Raw { bytes: Vec<u8>, mime_type: String },
    /// Encoded data for the slideshow frame
    Display(DisplayImage),
}

/// Encoded image, optional blurred background, and caption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayImage {
    /// `data:` URI of the image
    pub image_data: String,
    /// `data:` URI of the blurred image, empty when blur is off
    pub image_blur_data: String,
    /// Date/time caption, empty when neither is shown
    pub image_date: String,
}

/// Run the pipeline for one request.
///
/// Any failure aborts the whole render; there is no partial result.
pub fn render(
    handle: &ImageHandle,
    cfg: &Config,
    want_raw: bool,
    request_id: &str,
) -> Result<RenderedImage, KioskError> {
    if want_raw {
        return Ok(RenderedImage::Raw {
            bytes: handle.bytes.clone(),
            mime_type: handle.mime_type.clone(),
        });
    }

    let started = Instant::now();
    let image_data = to_data_uri(&handle.bytes)?;
    debug!(
        request_id,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "converted image"
    );

    let image_blur_data = if cfg.background_blur {
        let started = Instant::now();
        let blurred = blur(&handle.bytes)?;
        let uri = to_data_uri(&blurred)?;
        debug!(
            request_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "blurred image"
        );
        uri
    } else {
        String::new()
    };

    Ok(RenderedImage::Display(DisplayImage {
        image_data,
        image_blur_data,
        image_date: caption(handle, cfg),
    }))
}

/// Encode image bytes as a `data:` URI, using the MIME type sniffed from the
/// bytes themselves.
pub fn to_data_uri(bytes: &[u8]) -> Result<String, KioskError> {
    let format = image::guess_format(bytes)
        .map_err(|e| KioskError::Image(format!("Unrecognised image data: {}", e)))?;
    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        general_purpose::STANDARD.encode(bytes)
    ))
}

/// Produce a heavily blurred JPEG of the image for use as a background.
pub fn blur(bytes: &[u8]) -> Result<Vec<u8>, KioskError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| KioskError::Image(format!("Failed to decode image: {}", e)))?;

    // Blur cost grows with area; the result is smeared anyway
    let img = if img.width() > BLUR_MAX_DIM || img.height() > BLUR_MAX_DIM {
        img.resize(BLUR_MAX_DIM, BLUR_MAX_DIM, FilterType::Triangle)
    } else {
        img
    };

    let blurred = DynamicImage::ImageRgb8(img.blur(BLUR_SIGMA).to_rgb8());

    let mut out = Cursor::new(Vec::new());
    blurred
        .write_to(&mut out, ImageFormat::Jpeg)
        .map_err(|e| KioskError::Image(format!("Failed to encode blurred image: {}", e)))?;
    Ok(out.into_inner())
}

/// Date/time caption for the image, per `showImageDate` × `showImageTime`.
pub fn caption(handle: &ImageHandle, cfg: &Config) -> String {
    let time_format = datetime::time_format(&cfg.image_time_format, IMAGE_TIME_FORMAT_24H);
    let parts = datetime::parts(
        &handle.local_date_time,
        cfg.show_image_date,
        cfg.show_image_time,
        &cfg.image_date_format,
        time_format,
    );

    match (parts.date, parts.time) {
        (Some(date), Some(time)) => format!("{} {}", date, time),
        (Some(date), None) => date,
        (None, Some(time)) => time,
        (None, None) => String::new(),
    }
}
