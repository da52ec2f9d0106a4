// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Generative effects delegated to a hosted inference API

pub mod client;
pub mod models;

use async_trait::async_trait;
use serde_json::Value;

pub use client::{InferenceError, Prediction, PredictionStatus, PredictionUrls, ReplicateClient};
pub use models::{extract_image_output, AiMode, AiOptions, ModelVersion};

/// Something that can run a hosted model to completion
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    /// Run `model` on `input` and return the model's raw output
    async fn run(&self, model: ModelVersion, input: Value) -> Result<Value, InferenceError>;

    /// Whether the backend is reachable with its credentials. Checked once
    /// at startup.
    async fn health_check(&self) -> bool {
        true
    }
}
