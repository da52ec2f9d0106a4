// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Quick adjust request types

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::imaging::QuickAdjustOptions;

/// JSON body for POST /api/adjust
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustRequest {
    /// Data URL (or bare base64) of the image to adjust
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub options: QuickAdjustOptions,
}

impl AdjustRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.image.as_deref().map_or(true, |s| s.trim().is_empty()) {
            return Err(ApiError::MissingImage);
        }
        self.options.validate().map_err(ApiError::from)
    }
}
