// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the photo studio backend

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Service name used in logs
pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "exif-orientation",
    "auto-normalize",
    "crop",
    "enhance-recipes",
    "quick-adjust",
    "compression-jpeg",
    "compression-png",
    "compression-webp-lossless",
    "ai-background-removal",
    "ai-retouch",
    "ai-style-transfer",
    "ai-object-removal",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} {}", SERVICE_NAME, VERSION_NUMBER)
}

/// Feature list as owned strings for the health response
pub fn features() -> Vec<String> {
    FEATURES.iter().map(|f| f.to_string()).collect()
}
