// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod imaging;
pub mod inference;
pub mod version;

// Re-export main types
pub use api::{create_app, start_server, ApiError, AppState};
pub use config::ServerConfig;
pub use imaging::{EnhanceMode, EnhanceOptions, ProcessedImage, ProcessingError};
pub use inference::{AiMode, PredictionBackend, ReplicateClient};
