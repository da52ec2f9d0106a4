// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AI effect modes and the hosted models that serve them

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Style used when the request does not name one
pub const DEFAULT_STYLE_PRESET: &str = "vangogh";

/// Retouch strength used when the request does not set one
pub const DEFAULT_RETOUCH_STRENGTH: f32 = 0.5;

/// A pinned model version on the hosted inference API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelVersion {
    /// `owner/name`
    pub name: &'static str,
    /// Version hash sent in the prediction body
    pub version: &'static str,
}

impl ModelVersion {
    /// `owner/name:version`
    pub fn identifier(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }
}

pub const REMBG: ModelVersion = ModelVersion {
    name: "ilkerc/rembg",
    version: "7f5cc3cd27573ab522e05738a8b8a02c3208c0a4abc105522719e0cd142d102e",
};

pub const REAL_ESRGAN: ModelVersion = ModelVersion {
    name: "nightmareai/real-esrgan",
    version: "42fed1c4974146d4d2414e2be2c5277c7fcf05fcc3a73abf41610695738c1d7b",
};

pub const STABLE_DIFFUSION: ModelVersion = ModelVersion {
    name: "stability-ai/stable-diffusion",
    version: "db21e45d3f7023abc2a46ee38a23973f6dce16bb082a930b0c49861f96d1e5bf",
};

pub const STABLE_DIFFUSION_INPAINTING: ModelVersion = ModelVersion {
    name: "stability-ai/stable-diffusion-inpainting",
    version: "c28b92a7ecd66eee4aefcd8a94eb9e7f6c3805d5f06038165407fb5cb355ba67",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiMode {
    /// Background removal
    Background,
    /// Face-aware super-resolution
    Retouch,
    /// Style transfer driven by a text prompt
    Style,
    /// Object removal via inpainting
    Remove,
}

/// Options posted with an AI request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiOptions {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub style_preset: Option<String>,
    #[serde(default)]
    pub retouch_strength: Option<f32>,
}

impl AiMode {
    pub const ALL: [AiMode; 4] = [
        AiMode::Background,
        AiMode::Retouch,
        AiMode::Style,
        AiMode::Remove,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AiMode::Background => "background",
            AiMode::Retouch => "retouch",
            AiMode::Style => "style",
            AiMode::Remove => "remove",
        }
    }

    pub fn model(&self) -> ModelVersion {
        match self {
            AiMode::Background => REMBG,
            AiMode::Retouch => REAL_ESRGAN,
            AiMode::Style => STABLE_DIFFUSION,
            AiMode::Remove => STABLE_DIFFUSION_INPAINTING,
        }
    }

    /// Model input for this mode. `image` is a data URL.
    pub fn build_input(&self, image: &str, options: &AiOptions) -> Value {
        match self {
            AiMode::Background | AiMode::Remove => json!({ "image": image }),
            AiMode::Retouch => json!({
                "image": image,
                "face_enhance": true,
                "strength": options.retouch_strength.unwrap_or(DEFAULT_RETOUCH_STRENGTH),
            }),
            AiMode::Style => {
                let preset = options
                    .style_preset
                    .as_deref()
                    .filter(|p| !p.trim().is_empty())
                    .unwrap_or(DEFAULT_STYLE_PRESET);
                json!({
                    "image": image,
                    "prompt": format!("Style of {}", preset),
                })
            }
        }
    }
}

/// Pull the result image reference out of a model's output. Models return
/// either a single URL or a list of URLs; for a list the first is used.
pub fn extract_image_output(output: &Value) -> Option<String> {
    match output {
        Value::String(url) if !url.is_empty() => Some(url.clone()),
        Value::Array(items) => items.iter().find_map(extract_image_output),
        _ => None,
    }
}
