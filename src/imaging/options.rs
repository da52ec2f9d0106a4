// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Editing options sent by the browser alongside an upload

use serde::{Deserialize, Deserializer, Serialize};

use super::error::ProcessingError;
use super::ops::CropRect;
use super::presets::EnhanceMode;

/// JPEG/WebP quality bounds
const MIN_QUALITY: u8 = 1;
const MAX_QUALITY: u8 = 100;

/// Slider values; every field may be omitted
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Adjustments {
    #[serde(default)]
    pub brightness: Option<f32>,
    #[serde(default)]
    pub contrast: Option<f32>,
    #[serde(default)]
    pub saturation: Option<f32>,
    #[serde(default)]
    pub sharpness: Option<f32>,
    #[serde(default)]
    pub blur: Option<f32>,
    /// Hue rotation in degrees
    #[serde(default)]
    pub temperature: Option<f32>,
}

/// Crop rectangle in image pixels, as reported by the cropper widget
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CropArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropArea {
    /// Round to whole pixels. `Ok(None)` means the rectangle is empty and
    /// the crop should be skipped.
    pub fn to_rect(&self) -> Result<Option<CropRect>, ProcessingError> {
        let left = self.x.round();
        let top = self.y.round();
        let width = self.width.round();
        let height = self.height.round();

        if width <= 0.0 || height <= 0.0 {
            return Ok(None);
        }

        if left < 0.0 || top < 0.0 {
            return Err(ProcessingError::invalid(
                "crop",
                format!("offset must not be negative, got ({}, {})", left, top),
            ));
        }

        if [left, top, width, height].iter().any(|v| *v > u32::MAX as f64) {
            return Err(ProcessingError::invalid("crop", "rectangle is too large"));
        }

        Ok(Some(CropRect {
            left: left as u32,
            top: top as u32,
            width: width as u32,
            height: height as u32,
        }))
    }
}

/// Output settings from the "Format & Compress" tab.
///
/// The browser sends `null` for a cleared number input, so every field is
/// optional: no quality means the default, no width means no resize.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Compression {
    #[serde(default)]
    pub quality: Option<u8>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub max_width: Option<u32>,
}

/// `null` deserializes to the type's default instead of failing
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Options for a full enhance request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceOptions {
    /// Recipe name; unknown names select the basic recipe
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adjustments: Adjustments,
    #[serde(default)]
    pub crop: Option<CropArea>,
    #[serde(default)]
    pub compression: Option<Compression>,
}

impl EnhanceOptions {
    pub fn enhance_mode(&self) -> EnhanceMode {
        self.mode
            .as_deref()
            .map(EnhanceMode::from_name)
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ProcessingError> {
        if let Some(ref crop) = self.crop {
            crop.to_rect()?;
        }

        if let Some(ref compression) = self.compression {
            if let Some(quality) = compression.quality {
                if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
                    return Err(ProcessingError::invalid(
                        "compression.quality",
                        format!(
                            "must be between {} and {}, got {}",
                            MIN_QUALITY, MAX_QUALITY, quality
                        ),
                    ));
                }
            }
            if compression.max_width == Some(0) {
                return Err(ProcessingError::invalid(
                    "compression.maxWidth",
                    "must be greater than 0",
                ));
            }
        }

        // Parameter ranges are checked on the resolved recipe
        for step in self.enhance_mode().recipe(&self.adjustments) {
            step.validate()?;
        }

        Ok(())
    }
}

/// Options for the quick adjust path: only brightness/saturation and crop
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuickAdjustOptions {
    #[serde(default)]
    pub adjustments: Option<Adjustments>,
    #[serde(default)]
    pub crop: Option<CropArea>,
}

impl QuickAdjustOptions {
    pub fn validate(&self) -> Result<(), ProcessingError> {
        if let Some(ref crop) = self.crop {
            crop.to_rect()?;
        }

        if let Some(ref adjustments) = self.adjustments {
            if let Some(brightness) = adjustments.brightness {
                if brightness <= 0.0 {
                    return Err(ProcessingError::invalid(
                        "adjustments.brightness",
                        format!("must be greater than 0, got {}", brightness),
                    ));
                }
            }
            if let Some(saturation) = adjustments.saturation {
                if saturation < 0.0 {
                    return Err(ProcessingError::invalid(
                        "adjustments.saturation",
                        format!("must not be negative, got {}", saturation),
                    ));
                }
            }
        }

        Ok(())
    }
}
