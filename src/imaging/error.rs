// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

use super::decode::ImageError;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("invalid {field}: {message}")]
    InvalidParameter { field: String, message: String },

    #[error(
        "crop region {width}x{height}+{left}+{top} exceeds image bounds {image_width}x{image_height}"
    )]
    CropOutOfBounds {
        left: u32,
        top: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("failed to encode output: {0}")]
    Encode(String),
}

impl ProcessingError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ProcessingError::InvalidParameter {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
