// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end processing for one request
//!
//! Order for `enhance`:
//! 1. Decode and apply EXIF orientation
//! 2. Normalize
//! 3. Crop (coordinates refer to the upright image)
//! 4. Mode recipe
//! 5. Compression: downscale to maxWidth and encode in the requested format,
//!    otherwise JPEG at quality 95

use image::RgbImage;
use tracing::debug;

use super::decode::{decode_data_url_image, decode_image_bytes, to_data_url};
use super::encode::{encode, OutputFormat, DEFAULT_JPEG_QUALITY};
use super::error::ProcessingError;
use super::ops;
use super::options::{CropArea, EnhanceOptions, QuickAdjustOptions};

/// Encoded result of a processing run
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

impl ProcessedImage {
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    pub fn to_data_url(&self) -> String {
        to_data_url(self.mime(), &self.bytes)
    }
}

/// Run the full enhance pipeline over raw upload bytes.
///
/// Compression settings are honored: the requested format and quality are
/// used and the image is downscaled to `maxWidth`. This departs from the
/// first version of the editor, which always re-encoded as JPEG quality 95
/// whatever the user picked. Missing settings still fall back to that.
pub fn enhance(bytes: &[u8], options: &EnhanceOptions) -> Result<ProcessedImage, ProcessingError> {
    options.validate()?;

    let (img, info) = decode_image_bytes(bytes)?;
    debug!(
        "Decoded {:?} {}x{} ({} bytes)",
        info.format, info.width, info.height, info.size_bytes
    );

    let mut img = prepare(img.to_rgb8(), options.crop.as_ref())?;

    let mode = options.enhance_mode();
    for step in mode.recipe(&options.adjustments) {
        img = step.apply(img);
    }

    let (img, format, quality) = match options.compression {
        Some(ref compression) => (
            match compression.max_width {
                Some(max_width) => ops::resize_within(img, max_width),
                None => img,
            },
            compression
                .format
                .as_deref()
                .map_or(OutputFormat::Jpeg, OutputFormat::from_name_or_jpeg),
            compression.quality.unwrap_or(DEFAULT_JPEG_QUALITY),
        ),
        None => (img, OutputFormat::Jpeg, DEFAULT_JPEG_QUALITY),
    };

    finish(img, format, quality)
}

/// Lightweight adjust used for live previews: normalize, crop, then
/// brightness/saturation only. Input and output are data URLs.
pub fn quick_adjust(
    data_url: &str,
    options: &QuickAdjustOptions,
) -> Result<ProcessedImage, ProcessingError> {
    options.validate()?;

    let (img, _) = decode_data_url_image(data_url)?;
    let mut img = prepare(img.to_rgb8(), options.crop.as_ref())?;

    if let Some(ref adjustments) = options.adjustments {
        ops::modulate(
            &mut img,
            adjustments.brightness.unwrap_or(1.0),
            adjustments.saturation.unwrap_or(1.0),
            0.0,
        );
    }

    finish(img, OutputFormat::Jpeg, DEFAULT_JPEG_QUALITY)
}

/// Base optimizations shared by both paths
fn prepare(mut img: RgbImage, crop: Option<&CropArea>) -> Result<RgbImage, ProcessingError> {
    ops::normalize(&mut img);

    match crop.map(CropArea::to_rect).transpose()?.flatten() {
        Some(rect) => ops::crop(&img, rect),
        None => Ok(img),
    }
}

fn finish(img: RgbImage, format: OutputFormat, quality: u8) -> Result<ProcessedImage, ProcessingError> {
    let bytes = encode(&img, format, quality)?;
    Ok(ProcessedImage {
        bytes,
        format,
        width: img.width(),
        height: img.height(),
    })
}
