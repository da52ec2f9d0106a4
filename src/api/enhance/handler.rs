// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Enhance endpoint handler

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, Json};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::response::EnhanceResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::upload::read_upload;
use crate::imaging::{self, EnhanceOptions};

/// POST /api/enhance - Run a recipe over an uploaded image
///
/// Pipeline:
/// 1. Read the multipart form (400 if no image)
/// 2. Parse and validate options
/// 3. Decode, normalize, crop, apply recipe and encode on a blocking thread
/// 4. Return the result as a data URL
pub async fn enhance_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<EnhanceResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let start = Instant::now();

    let mut upload = read_upload(multipart, state.config.max_upload_bytes).await?;
    let image = upload.require_image()?;
    let options: EnhanceOptions = upload.parse_options()?;

    if let Err(e) = options.validate() {
        warn!("[{}] Enhance options rejected: {}", request_id, e);
        return Err(e.into());
    }

    let mode = options.enhance_mode();
    debug!(
        "[{}] Enhance request: mode={}, file={:?}, {} bytes, crop={}, compression={}",
        request_id,
        mode.as_str(),
        image.file_name,
        image.bytes.len(),
        options.crop.is_some(),
        options.compression.is_some()
    );

    let processed = tokio::task::spawn_blocking(move || imaging::enhance(&image.bytes, &options))
        .await
        .map_err(|e| ApiError::ProcessingFailed(format!("enhance task panicked: {}", e)))?
        .map_err(|e| {
            warn!("[{}] Enhance failed: {}", request_id, e);
            ApiError::from(e)
        })?;

    let elapsed = start.elapsed().as_millis() as u64;
    info!(
        "[{}] Enhanced image: mode={}, {}x{} {}, {} bytes, {}ms",
        request_id,
        mode.as_str(),
        processed.width,
        processed.height,
        processed.mime(),
        processed.bytes.len(),
        elapsed
    );

    Ok(Json(EnhanceResponse::from_processed(
        &processed,
        Some(mode.as_str()),
        elapsed,
    )))
}
