// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Output encoding

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::ProcessingError;

/// Quality used when the request carries no compression settings
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::Webp),
            _ => None,
        }
    }

    /// Like `from_name`, but formats without an encoder here (e.g. avif)
    /// degrade to JPEG instead of failing the request
    pub fn from_name_or_jpeg(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!("Unsupported output format '{}', falling back to jpeg", name);
            OutputFormat::Jpeg
        })
    }

    pub fn mime(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Webp => "image/webp",
        }
    }
}

/// Encode `img` in `format`. `quality` only affects JPEG; PNG is lossless
/// and the WebP encoder available here is lossless only.
pub fn encode(img: &RgbImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>, ProcessingError> {
    let mut buf = Vec::new();

    let result = match format {
        OutputFormat::Jpeg => {
            // The jpeg encoder does not subsample chroma (4:4:4)
            img.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)))
        }
        OutputFormat::Png => img.write_with_encoder(PngEncoder::new(&mut buf)),
        OutputFormat::Webp => img.write_with_encoder(WebPEncoder::new_lossless(&mut buf)),
    };

    result.map_err(|e| ProcessingError::Encode(e.to_string()))?;
    Ok(buf)
}
