// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Quick adjust endpoint handler

use std::time::Instant;

use axum::{extract::rejection::JsonRejection, Json};
use tracing::{debug, warn};

use super::request::AdjustRequest;
use crate::api::enhance::EnhanceResponse;
use crate::api::errors::ApiError;
use crate::imaging;

/// POST /api/adjust - Brightness/saturation preview on a data URL
pub async fn adjust_handler(
    body: Result<Json<AdjustRequest>, JsonRejection>,
) -> Result<Json<EnhanceResponse>, ApiError> {
    let Json(request) = body.map_err(|e| {
        warn!("Rejected adjust body: {}", e.body_text());
        ApiError::InvalidRequest(e.body_text())
    })?;

    request.validate()?;

    let start = Instant::now();
    let AdjustRequest { image, options } = request;
    let image = image.unwrap_or_default();

    let processed = tokio::task::spawn_blocking(move || imaging::quick_adjust(&image, &options))
        .await
        .map_err(|e| ApiError::ProcessingFailed(format!("adjust task panicked: {}", e)))??;

    let elapsed = start.elapsed().as_millis() as u64;
    debug!(
        "Quick adjust: {}x{}, {} bytes, {}ms",
        processed.width,
        processed.height,
        processed.bytes.len(),
        elapsed
    );

    Ok(Json(EnhanceResponse::from_processed(&processed, None, elapsed)))
}
