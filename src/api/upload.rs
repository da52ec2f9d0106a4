// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart form reading shared by the upload endpoints
//!
//! Both `/api/enhance` and `/api/ai` take an `image` file part and an
//! optional `options` text part holding JSON.

use axum::http::StatusCode;
use axum_extra::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::errors::ApiError;

pub const IMAGE_FIELD: &str = "image";
pub const OPTIONS_FIELD: &str = "options";

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

/// Parts of an upload form this service understands
#[derive(Debug, Default)]
pub struct ImageUpload {
    pub image: Option<UploadedImage>,
    pub options: Option<String>,
}

impl ImageUpload {
    /// The image part, or 400 "No image provided" when absent or empty
    pub fn require_image(&mut self) -> Result<UploadedImage, ApiError> {
        match self.image.take() {
            Some(image) if !image.bytes.is_empty() => Ok(image),
            _ => Err(ApiError::MissingImage),
        }
    }

    pub fn parse_options<T: DeserializeOwned + Default>(&self) -> Result<T, ApiError> {
        parse_options(self.options.as_deref())
    }
}

/// Read every field of the form. Unknown fields are ignored.
pub async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
    limit: usize,
) -> Result<ImageUpload, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        warn!("Rejected non-multipart upload: {}", e.body_text());
        ApiError::InvalidRequest(e.body_text())
    })?;

    let mut upload = ImageUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(IMAGE_FIELD) => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
                debug!(
                    "Received image part: {:?}, {} bytes, content_type={:?}",
                    file_name,
                    bytes.len(),
                    content_type
                );
                upload.image = Some(UploadedImage {
                    bytes,
                    content_type,
                    file_name,
                });
            }
            Some(OPTIONS_FIELD) => {
                upload.options = Some(field.text().await.map_err(|e| multipart_error(e, limit))?);
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    Ok(upload)
}

/// Parse an options JSON string. Missing or blank options mean defaults.
pub fn parse_options<T: DeserializeOwned + Default>(raw: Option<&str>) -> Result<T, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(T::default()),
        Some(json) => serde_json::from_str(json).map_err(|e| {
            warn!("Malformed options JSON: {}", e);
            ApiError::InvalidRequest(format!("Invalid options JSON: {}", e))
        }),
    }
}

fn multipart_error(err: MultipartError, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit }
    } else {
        ApiError::InvalidRequest(err.body_text())
    }
}
