// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Quick adjust API endpoint module
//!
//! Provides POST /api/adjust for live slider previews.

pub mod handler;
pub mod request;

pub use handler::adjust_handler;
pub use request::AdjustRequest;
