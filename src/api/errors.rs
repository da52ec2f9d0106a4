// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::error;

use crate::imaging::{ImageError, ProcessingError};
use crate::inference::InferenceError;

/// Message returned for failures whose cause stays in the server log
pub const GENERIC_FAILURE: &str = "Failed to process image";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    MissingImage,
    InvalidRequest(String),
    ValidationError { field: String, message: String },
    PayloadTooLarge { limit: usize },
    ServiceUnavailable(String),
    /// Cause is logged, client sees the generic message
    ProcessingFailed(String),
    Timeout,
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::MissingImage => ("missing_image", "No image provided".to_string(), None),
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::PayloadTooLarge { limit } => {
                let mut details = HashMap::new();
                details.insert(
                    "limit".to_string(),
                    serde_json::Value::Number((*limit as u64).into()),
                );
                (
                    "payload_too_large",
                    format!("Upload exceeds {} bytes", limit),
                    Some(details),
                )
            }
            ApiError::ServiceUnavailable(msg) => ("service_unavailable", msg.clone(), None),
            ApiError::ProcessingFailed(_) => ("internal_error", GENERIC_FAILURE.to_string(), None),
            ApiError::Timeout => ("timeout", "Request timed out".to_string(), None),
        };

        ErrorResponse {
            error: message,
            error_type: error_type.to_string(),
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingImage
            | ApiError::InvalidRequest(_)
            | ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::ProcessingFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingImage => write!(f, "No image provided"),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::PayloadTooLarge { limit } => write!(f, "Upload exceeds {} bytes", limit),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::ProcessingFailed(msg) => write!(f, "Processing failed: {}", msg),
            ApiError::Timeout => write!(f, "Request timed out"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::ProcessingFailed(ref cause) = self {
            error!("Image processing error: {}", cause);
        }
        (self.status_code(), Json(self.to_response())).into_response()
    }
}

impl From<ProcessingError> for ApiError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::Image(ImageError::TooLarge(_, limit)) => {
                ApiError::PayloadTooLarge { limit }
            }
            ProcessingError::Image(e) => ApiError::InvalidRequest(e.to_string()),
            ProcessingError::InvalidParameter { field, message } => {
                ApiError::ValidationError { field, message }
            }
            e @ ProcessingError::CropOutOfBounds { .. } => ApiError::ValidationError {
                field: "crop".to_string(),
                message: e.to_string(),
            },
            ProcessingError::Encode(msg) => ApiError::ProcessingFailed(msg),
        }
    }
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::Timeout { .. } => ApiError::Timeout,
            e => ApiError::ProcessingFailed(e.to_string()),
        }
    }
}
