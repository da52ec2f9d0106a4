// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AI effect request parsing

use crate::api::errors::ApiError;
use crate::api::upload::UploadedImage;
use crate::imaging::{decode::format_to_mime, detect_format, to_data_url};
use crate::inference::{AiMode, AiOptions};

/// Resolve the requested effect. A missing or unknown mode is a bad request.
pub fn resolve_mode(options: &AiOptions) -> Result<AiMode, ApiError> {
    let name = options
        .mode
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::ValidationError {
            field: "mode".to_string(),
            message: "mode is required".to_string(),
        })?;

    AiMode::from_name(name).ok_or_else(|| ApiError::ValidationError {
        field: "mode".to_string(),
        message: format!(
            "unknown mode '{}', expected one of: {}",
            name,
            AiMode::ALL.map(|m| m.as_str()).join(", ")
        ),
    })
}

/// Frame the upload as a data URL. The declared content type is used when it
/// names an image; otherwise the type is sniffed from the bytes.
pub fn image_data_url(image: &UploadedImage) -> Result<String, ApiError> {
    let declared = image
        .content_type
        .as_deref()
        .filter(|ct| ct.starts_with("image/"));

    let mime = match declared {
        Some(ct) => ct,
        None => detect_format(&image.bytes)
            .map(format_to_mime)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?,
    };

    Ok(to_data_url(mime, &image.bytes))
}
