// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Enhance modes and the operation recipe each one runs

use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::error::ProcessingError;
use super::ops;
use super::options::Adjustments;

const MIN_GAMMA: f32 = 1.0;
const MAX_GAMMA: f32 = 3.0;
const MAX_SHARPEN_SIGMA: f32 = 10.0;

// Fallbacks for the basic recipe when a slider is missing or zero
const BASIC_BRIGHTNESS: f32 = 1.15;
const BASIC_SATURATION: f32 = 1.3;
const BASIC_HUE: f32 = 5.0;
const BASIC_GAMMA: f32 = 1.2;
const BASIC_SHARPEN_SIGMA: f32 = 1.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnhanceMode {
    #[default]
    Basic,
    Enhance,
    Portrait,
    Landscape,
    Art,
    BlackAndWhite,
    Vintage,
    Sepia,
}

/// A single step of a recipe
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterStep {
    Modulate {
        brightness: f32,
        saturation: f32,
        hue: f32,
    },
    Gamma(f32),
    Sharpen {
        sigma: f32,
        flat: f32,
        jagged: f32,
    },
    Median(u32),
    Blur(f32),
    Linear {
        a: f32,
        b: f32,
    },
    Tint([u8; 3]),
    Grayscale,
}

impl EnhanceMode {
    pub const ALL: [EnhanceMode; 8] = [
        EnhanceMode::Basic,
        EnhanceMode::Enhance,
        EnhanceMode::Portrait,
        EnhanceMode::Landscape,
        EnhanceMode::Art,
        EnhanceMode::BlackAndWhite,
        EnhanceMode::Vintage,
        EnhanceMode::Sepia,
    ];

    /// Resolve a mode name from the UI. Filters the server has no recipe
    /// for ("none", "hdr", "vivid", ...) run the basic recipe.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == name)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnhanceMode::Basic => "basic",
            EnhanceMode::Enhance => "enhance",
            EnhanceMode::Portrait => "portrait",
            EnhanceMode::Landscape => "landscape",
            EnhanceMode::Art => "art",
            EnhanceMode::BlackAndWhite => "blackAndWhite",
            EnhanceMode::Vintage => "vintage",
            EnhanceMode::Sepia => "sepia",
        }
    }

    /// Ordered operations for this mode. Only the basic/enhance recipe reads
    /// the sliders; the stylistic presets are fixed.
    pub fn recipe(&self, adjustments: &Adjustments) -> Vec<FilterStep> {
        use FilterStep::*;

        match self {
            EnhanceMode::Portrait => vec![
                Modulate {
                    brightness: 1.2,
                    saturation: 1.5,
                    hue: 5.0,
                },
                Gamma(1.1),
                Sharpen {
                    sigma: 1.5,
                    flat: 0.7,
                    jagged: 0.7,
                },
                Median(3),
                Blur(0.5),
            ],
            EnhanceMode::Landscape => vec![
                Modulate {
                    brightness: 1.3,
                    saturation: 1.6,
                    hue: -5.0,
                },
                Gamma(1.2),
                Sharpen {
                    sigma: 1.8,
                    flat: 1.0,
                    jagged: 0.7,
                },
                Linear { a: 1.1, b: -20.0 },
            ],
            EnhanceMode::Art => vec![
                Modulate {
                    brightness: 1.4,
                    saturation: 1.8,
                    hue: 15.0,
                },
                Gamma(1.3),
                Sharpen {
                    sigma: 2.0,
                    flat: 1.5,
                    jagged: 0.8,
                },
                Linear { a: 1.2, b: -30.0 },
            ],
            EnhanceMode::BlackAndWhite => vec![
                Grayscale,
                Modulate {
                    brightness: 1.2,
                    saturation: 1.0,
                    hue: 0.0,
                },
                Gamma(1.2),
                Sharpen {
                    sigma: 1.5,
                    flat: 1.0,
                    jagged: 0.5,
                },
                Linear { a: 1.1, b: -10.0 },
            ],
            EnhanceMode::Vintage => vec![
                Modulate {
                    brightness: 1.1,
                    saturation: 0.8,
                    hue: -10.0,
                },
                Gamma(1.1),
                Tint([200, 180, 150]),
                Sharpen {
                    sigma: 1.2,
                    flat: 0.5,
                    jagged: 0.5,
                },
            ],
            EnhanceMode::Sepia => vec![
                Modulate {
                    brightness: 1.1,
                    saturation: 0.7,
                    hue: -20.0,
                },
                Gamma(1.1),
                Tint([112, 66, 20]),
                Sharpen {
                    sigma: 1.2,
                    flat: 0.5,
                    jagged: 0.5,
                },
            ],
            EnhanceMode::Basic | EnhanceMode::Enhance => vec![
                Modulate {
                    brightness: nonzero_or(adjustments.brightness, BASIC_BRIGHTNESS),
                    saturation: nonzero_or(adjustments.saturation, BASIC_SATURATION),
                    hue: nonzero_or(adjustments.temperature, BASIC_HUE),
                },
                Gamma(nonzero_or(adjustments.contrast, BASIC_GAMMA)),
                Sharpen {
                    sigma: nonzero_or(adjustments.sharpness, BASIC_SHARPEN_SIGMA),
                    flat: 1.0,
                    jagged: 0.5,
                },
                Blur(ops::valid_blur_sigma(adjustments.blur)),
                Linear { a: 1.1, b: -10.0 },
            ],
        }
    }
}

/// A slider left at zero means "use the default", not "apply zero"
fn nonzero_or(value: Option<f32>, default: f32) -> f32 {
    match value {
        Some(v) if v != 0.0 && v.is_finite() => v,
        _ => default,
    }
}

impl FilterStep {
    pub fn validate(&self) -> Result<(), ProcessingError> {
        match *self {
            FilterStep::Modulate {
                brightness,
                saturation,
                ..
            } => {
                if brightness <= 0.0 {
                    return Err(ProcessingError::invalid(
                        "brightness",
                        format!("must be greater than 0, got {}", brightness),
                    ));
                }
                if saturation < 0.0 {
                    return Err(ProcessingError::invalid(
                        "saturation",
                        format!("must not be negative, got {}", saturation),
                    ));
                }
            }
            FilterStep::Gamma(g) => {
                if !(MIN_GAMMA..=MAX_GAMMA).contains(&g) {
                    return Err(ProcessingError::invalid(
                        "gamma",
                        format!(
                            "must be between {:.1} and {:.1}, got {}",
                            MIN_GAMMA, MAX_GAMMA, g
                        ),
                    ));
                }
            }
            FilterStep::Sharpen {
                sigma,
                flat,
                jagged,
            } => {
                if sigma <= 0.0 || sigma > MAX_SHARPEN_SIGMA {
                    return Err(ProcessingError::invalid(
                        "sharpness",
                        format!(
                            "sigma must be in (0, {}], got {}",
                            MAX_SHARPEN_SIGMA, sigma
                        ),
                    ));
                }
                if flat < 0.0 || jagged < 0.0 {
                    return Err(ProcessingError::invalid(
                        "sharpness",
                        "gains must not be negative",
                    ));
                }
            }
            FilterStep::Median(size) => {
                if size == 0 || size % 2 == 0 {
                    return Err(ProcessingError::invalid(
                        "median",
                        format!("window must be odd, got {}", size),
                    ));
                }
            }
            FilterStep::Blur(_)
            | FilterStep::Linear { .. }
            | FilterStep::Tint(_)
            | FilterStep::Grayscale => {}
        }
        Ok(())
    }

    pub fn apply(&self, mut img: RgbImage) -> RgbImage {
        match *self {
            FilterStep::Modulate {
                brightness,
                saturation,
                hue,
            } => {
                ops::modulate(&mut img, brightness, saturation, hue);
                img
            }
            FilterStep::Gamma(g) => {
                ops::gamma(&mut img, g);
                img
            }
            FilterStep::Sharpen {
                sigma,
                flat,
                jagged,
            } => ops::sharpen(&img, sigma, flat, jagged),
            FilterStep::Median(size) => ops::median(&img, size),
            FilterStep::Blur(sigma) => ops::blur(&img, sigma),
            FilterStep::Linear { a, b } => {
                ops::linear(&mut img, a, b);
                img
            }
            FilterStep::Tint(color) => {
                ops::tint(&mut img, color);
                img
            }
            FilterStep::Grayscale => ops::grayscale(&img),
        }
    }
}
