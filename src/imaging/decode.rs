// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image loading, format sniffing and data URL framing

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{metadata::Orientation, DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use thiserror::Error;

/// Hard cap on encoded input size (25MB)
pub const MAX_IMAGE_SIZE: usize = 25 * 1024 * 1024;

/// Hard cap on decoded pixel count (50 megapixels)
pub const MAX_PIXELS: u64 = 50_000_000;

/// Custom error types for image loading
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Image dimensions too large: {0}x{1} (max {2} pixels)")]
    TooManyPixels(u32, u32, u64),

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,
}

/// Image information extracted during loading
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Width in pixels, after orientation is applied
    pub width: u32,
    /// Height in pixels, after orientation is applied
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// Size in bytes
    pub size_bytes: usize,
}

/// Decode raw image bytes and apply the EXIF orientation.
///
/// The returned image is upright: a portrait photo stored sideways with
/// orientation tag 6 comes back rotated, and `ImageInfo` reports the
/// rotated dimensions.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<(DynamicImage, ImageInfo), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    let format = detect_format(bytes)?;

    let mut decoder = ImageReader::with_format(Cursor::new(bytes), format)
        .into_decoder()
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let (width, height) = decoder.dimensions();
    if width as u64 * height as u64 > MAX_PIXELS {
        return Err(ImageError::TooManyPixels(width, height, MAX_PIXELS));
    }

    // Missing or unreadable EXIF is not an error
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);

    let mut img =
        DynamicImage::from_decoder(decoder).map_err(|e| ImageError::DecodeFailed(e.to_string()))?;
    img.apply_orientation(orientation);

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((img, info))
}

/// Decode a data URL (or bare base64 string) into an upright image
pub fn decode_data_url_image(input: &str) -> Result<(DynamicImage, ImageInfo), ImageError> {
    let (_, bytes) = parse_data_url(input)?;
    decode_image_bytes(&bytes)
}

/// Split a `data:<mime>;base64,<payload>` string into its mime type and
/// decoded bytes. A bare base64 payload is accepted and yields no mime.
pub fn parse_data_url(input: &str) -> Result<(Option<String>, Vec<u8>), ImageError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ImageError::EmptyData);
    }

    let Some(rest) = input.strip_prefix("data:") else {
        return Ok((None, STANDARD.decode(input)?));
    };

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::InvalidDataUrl("missing ',' separator".to_string()))?;

    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| ImageError::InvalidDataUrl("only base64 payloads are supported".to_string()))?;

    let bytes = STANDARD.decode(payload)?;
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    let mime = (!mime.is_empty()).then(|| mime.to_string());
    Ok((mime, bytes))
}

/// Frame bytes as a base64 data URL
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        // TIFF: II (little-endian) or MM (big-endian)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(ImageFormat::Tiff),

        _ => Err(ImageError::UnsupportedFormat),
    }
}

/// Mime type for a sniffed input format
pub fn format_to_mime(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Gif => "image/gif",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        _ => "application/octet-stream",
    }
}
