// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AI effect API endpoint module
//!
//! Provides POST /api/ai for background removal, retouching, style transfer
//! and object removal through the hosted prediction API.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::ai_handler;
pub use response::AiResponse;
