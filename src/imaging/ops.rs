// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pixel operations on 8-bit RGB images
//!
//! Kernels (gaussian blur, median, resampling) come from `image` and
//! `imageproc`; this module adds the per-pixel tonal transforms on top.

use image::{imageops, imageops::FilterType, DynamicImage, RgbImage};

use super::color::{lab_to_rgb8, rgb8_to_lab, Lab};
use super::error::ProcessingError;

/// Smallest gaussian sigma accepted by `blur`
pub const MIN_BLUR_SIGMA: f32 = 0.3;
/// Largest gaussian sigma accepted by `blur`
pub const MAX_BLUR_SIGMA: f32 = 1000.0;
/// Sigma used when a blur amount is not supplied
pub const DEFAULT_BLUR_SIGMA: f32 = 0.3;

/// Detail below this magnitude counts as a flat area for `sharpen`
const SHARPEN_FLAT_THRESHOLD: f32 = 2.0;
/// Per-pixel limits on how far `sharpen` may move a value
const SHARPEN_MAX_BRIGHTEN: f32 = 25.5;
const SHARPEN_MAX_DARKEN: f32 = 51.0;

/// Fraction of pixels clipped at each end by `normalize`
const NORMALIZE_CLIP: f64 = 0.01;

/// Pixel-space crop rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Clamp a requested blur sigma into the supported range
pub fn valid_blur_sigma(sigma: Option<f32>) -> f32 {
    sigma
        .unwrap_or(DEFAULT_BLUR_SIGMA)
        .clamp(MIN_BLUR_SIGMA, MAX_BLUR_SIGMA)
}

/// Stretch lightness so the 1st percentile maps to black and the 99th to white
pub fn normalize(img: &mut RgbImage) {
    let total = img.width() as u64 * img.height() as u64;
    if total == 0 {
        return;
    }

    let labs: Vec<Lab> = img.pixels().map(|p| rgb8_to_lab(p.0)).collect();

    // 0.1 L resolution
    let mut histogram = [0u64; 1001];
    for lab in &labs {
        let bin = (lab.l.clamp(0.0, 100.0) * 10.0).round() as usize;
        histogram[bin] += 1;
    }

    let clip = (total as f64 * NORMALIZE_CLIP).floor() as u64;
    let lo = percentile_bin(&histogram, clip) as f32 / 10.0;
    let hi = percentile_bin(&histogram, total.saturating_sub(clip + 1)) as f32 / 10.0;

    if hi - lo < 1.0 {
        return;
    }

    let scale = 100.0 / (hi - lo);
    for (pixel, lab) in img.pixels_mut().zip(labs) {
        let l = ((lab.l - lo) * scale).clamp(0.0, 100.0);
        pixel.0 = lab_to_rgb8(Lab { l, ..lab });
    }
}

/// Index of the bin holding the `rank`-th smallest sample
fn percentile_bin(histogram: &[u64], rank: u64) -> usize {
    let mut seen = 0u64;
    for (bin, count) in histogram.iter().enumerate() {
        seen += count;
        if seen > rank {
            return bin;
        }
    }
    histogram.len() - 1
}

/// Scale lightness and chroma, rotate hue (degrees), in LCh space
pub fn modulate(img: &mut RgbImage, brightness: f32, saturation: f32, hue: f32) {
    if brightness == 1.0 && saturation == 1.0 && hue == 0.0 {
        return;
    }

    for pixel in img.pixels_mut() {
        let mut lch = rgb8_to_lab(pixel.0).to_lch();
        lch.l = (lch.l * brightness).clamp(0.0, 100.0);
        lch.c *= saturation;
        lch.h = (lch.h + hue).rem_euclid(360.0);
        pixel.0 = lab_to_rgb8(lch.to_lab());
    }
}

/// Gamma encode every channel with exponent 1/gamma
pub fn gamma(img: &mut RgbImage, gamma: f32) {
    let exponent = 1.0 / gamma;
    let lut = build_lut(|v| 255.0 * (v / 255.0).powf(exponent));
    apply_lut(img, &lut);
}

/// Per-channel `a * v + b`
pub fn linear(img: &mut RgbImage, a: f32, b: f32) {
    let lut = build_lut(|v| a * v + b);
    apply_lut(img, &lut);
}

fn build_lut(f: impl Fn(f32) -> f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, out) in lut.iter_mut().enumerate() {
        *out = f(i as f32).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

fn apply_lut(img: &mut RgbImage, lut: &[u8; 256]) {
    for value in img.iter_mut() {
        *value = lut[*value as usize];
    }
}

/// Keep each pixel's lightness and give it the chroma of `color`
pub fn tint(img: &mut RgbImage, color: [u8; 3]) {
    let tint = rgb8_to_lab(color);
    for pixel in img.pixels_mut() {
        let lab = rgb8_to_lab(pixel.0);
        pixel.0 = lab_to_rgb8(Lab {
            l: lab.l,
            a: tint.a,
            b: tint.b,
        });
    }
}

/// Unsharp mask. `flat_gain` applies where local detail is below the flat
/// threshold, `jagged_gain` everywhere else.
pub fn sharpen(img: &RgbImage, sigma: f32, flat_gain: f32, jagged_gain: f32) -> RgbImage {
    let blurred = imageops::blur(img, sigma);
    let mut out = img.clone();

    for (value, soft) in out.iter_mut().zip(blurred.iter()) {
        let v = *value as f32;
        let detail = v - *soft as f32;
        let gain = if detail.abs() <= SHARPEN_FLAT_THRESHOLD {
            flat_gain
        } else {
            jagged_gain
        };
        let delta = (gain * detail).clamp(-SHARPEN_MAX_DARKEN, SHARPEN_MAX_BRIGHTEN);
        *value = (v + delta).round().clamp(0.0, 255.0) as u8;
    }

    out
}

/// Square median filter with an odd window `size`
pub fn median(img: &RgbImage, size: u32) -> RgbImage {
    let radius = size / 2;
    if radius == 0 {
        return img.clone();
    }
    imageproc::filter::median_filter(img, radius, radius)
}

/// Gaussian blur; `sigma` is clamped to the supported range
pub fn blur(img: &RgbImage, sigma: f32) -> RgbImage {
    imageops::blur(img, sigma.clamp(MIN_BLUR_SIGMA, MAX_BLUR_SIGMA))
}

/// Luma-only copy, kept in RGB layout
pub fn grayscale(img: &RgbImage) -> RgbImage {
    DynamicImage::ImageLuma8(imageops::grayscale(img)).to_rgb8()
}

pub fn crop(img: &RgbImage, rect: CropRect) -> Result<RgbImage, ProcessingError> {
    let fits_x = rect.left as u64 + rect.width as u64 <= img.width() as u64;
    let fits_y = rect.top as u64 + rect.height as u64 <= img.height() as u64;

    if !fits_x || !fits_y {
        return Err(ProcessingError::CropOutOfBounds {
            left: rect.left,
            top: rect.top,
            width: rect.width,
            height: rect.height,
            image_width: img.width(),
            image_height: img.height(),
        });
    }

    Ok(imageops::crop_imm(img, rect.left, rect.top, rect.width, rect.height).to_image())
}

/// Downscale to at most `max_width` wide, preserving aspect ratio.
/// Images already narrow enough are returned untouched.
pub fn resize_within(img: RgbImage, max_width: u32) -> RgbImage {
    if max_width == 0 || img.width() <= max_width {
        return img;
    }

    let scale = max_width as f64 / img.width() as f64;
    let height = ((img.height() as f64 * scale).round() as u32).max(1);
    imageops::resize(&img, max_width, height, FilterType::Lanczos3)
}
