// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AI effect response types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiResponse {
    /// Reference to the result image as returned by the model (usually a URL)
    pub enhanced_image: String,
    pub mode: String,
    /// `owner/name` of the model that produced the result
    pub model: String,
    pub processing_time_ms: u64,
}
