// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server configuration from command line flags and environment

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::inference::client::DEFAULT_BASE_URL;

/// Default upload limit (10MB), matching the UI's dropzone limit
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Photo studio HTTP server
#[derive(Parser, Debug, Clone)]
#[command(name = "photo-studio")]
#[command(about = "Photo editing backend: pixel recipes, compression and hosted AI effects", long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:8080")]
    pub listen_addr: SocketAddr,

    /// API token for the hosted inference service; AI effects are disabled without it
    #[arg(long, env = "REPLICATE_API_TOKEN", hide_env_values = true)]
    pub replicate_api_token: Option<String>,

    /// Base URL of the hosted inference service
    #[arg(long, env = "REPLICATE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub replicate_base_url: String,

    /// Maximum request body size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Timeout for a single call to the inference service, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 120)]
    pub request_timeout_secs: u64,

    /// Upper bound on a whole prediction including polling, in seconds
    #[arg(long, env = "PREDICTION_TIMEOUT_SECS", default_value_t = 300)]
    pub prediction_timeout_secs: u64,

    /// Delay between prediction status polls, in milliseconds
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Directory holding the pre-built browser UI, served for unmatched paths
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            replicate_api_token: None,
            replicate_base_url: DEFAULT_BASE_URL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_timeout_secs: 120,
            prediction_timeout_secs: 300,
            poll_interval_ms: 1000,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn prediction_timeout(&self) -> Duration {
        Duration::from_secs(self.prediction_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Token, if one is set and non-blank
    pub fn api_token(&self) -> Option<&str> {
        self.replicate_api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
