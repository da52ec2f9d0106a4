// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Response body shared by the pixel-processing endpoints

use serde::{Deserialize, Serialize};

use crate::imaging::ProcessedImage;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceResponse {
    /// `data:<mime>;base64,...`
    pub enhanced_image: String,
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
    /// Recipe that was applied; absent for quick adjust
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub processing_time_ms: u64,
}

impl EnhanceResponse {
    pub fn from_processed(
        processed: &ProcessedImage,
        mode: Option<&str>,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            enhanced_image: processed.to_data_url(),
            width: processed.width,
            height: processed.height,
            mime_type: processed.mime().to_string(),
            mode: mode.map(str::to_string),
            processing_time_ms,
        }
    }
}
