// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AI effect endpoint handler

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, Json};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::request::{image_data_url, resolve_mode};
use super::response::AiResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::upload::read_upload;
use crate::inference::{extract_image_output, AiOptions};

/// POST /api/ai - Run a hosted model over an uploaded image
///
/// Pipeline:
/// 1. Read the multipart form (400 if no image)
/// 2. Parse options and resolve the mode (400 if missing or unknown)
/// 3. Get the prediction backend from AppState (503 if absent)
/// 4. Frame the image as a data URL and run the mode's model
/// 5. Return the first image reference in the model output
pub async fn ai_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AiResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let start = Instant::now();

    let mut upload = read_upload(multipart, state.config.max_upload_bytes).await?;
    let image = upload.require_image()?;
    let options: AiOptions = upload.parse_options()?;
    let mode = resolve_mode(&options)?;

    let backend = state.prediction_backend.as_ref().ok_or_else(|| {
        warn!("[{}] AI request without a configured API token", request_id);
        ApiError::ServiceUnavailable("AI features are not configured".to_string())
    })?;

    let data_url = image_data_url(&image)?;
    let model = mode.model();
    debug!(
        "[{}] AI request: mode={}, model={}, file={:?}, {} bytes",
        request_id,
        mode.as_str(),
        model.identifier(),
        image.file_name,
        image.bytes.len()
    );

    let output = backend
        .run(model, mode.build_input(&data_url, &options))
        .await
        .map_err(|e| {
            warn!("[{}] Prediction failed: {}", request_id, e);
            ApiError::from(e)
        })?;

    let enhanced_image = extract_image_output(&output).ok_or_else(|| {
        ApiError::ProcessingFailed(format!(
            "model {} returned no image reference: {}",
            model.name, output
        ))
    })?;

    let elapsed = start.elapsed().as_millis() as u64;
    info!(
        "[{}] AI effect complete: mode={}, model={}, {}ms",
        request_id,
        mode.as_str(),
        model.name,
        elapsed
    );

    Ok(Json(AiResponse {
        enhanced_image,
        mode: mode.as_str().to_string(),
        model: model.name.to_string(),
        processing_time_ms: elapsed,
    }))
}
