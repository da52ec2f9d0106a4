// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod adjust;
pub mod ai;
pub mod enhance;
pub mod errors;
pub mod http_server;
pub mod upload;

pub use adjust::{adjust_handler, AdjustRequest};
pub use ai::{ai_handler, AiResponse};
pub use enhance::{enhance_handler, EnhanceResponse};
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_app, start_server, AppState, HealthResponse};
