// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Enhance API endpoint module
//!
//! Provides POST /api/enhance for recipe-based processing of an upload.

pub mod handler;
pub mod response;

pub use handler::enhance_handler;
pub use response::EnhanceResponse;
