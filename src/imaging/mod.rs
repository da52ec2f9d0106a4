// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Deterministic pixel processing for the enhance and adjust endpoints
//!
//! Everything here is synchronous and CPU bound; callers on the async
//! runtime should run it on a blocking thread.

pub mod color;
pub mod decode;
pub mod encode;
pub mod error;
pub mod ops;
pub mod options;
pub mod pipeline;
pub mod presets;

pub use decode::{decode_image_bytes, detect_format, parse_data_url, to_data_url, ImageError, ImageInfo};
pub use encode::OutputFormat;
pub use error::ProcessingError;
pub use options::{Adjustments, Compression, CropArea, EnhanceOptions, QuickAdjustOptions};
pub use pipeline::{enhance, quick_adjust, ProcessedImage};
pub use presets::{EnhanceMode, FilterStep};
