// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client for the hosted prediction API (Replicate-compatible)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::models::ModelVersion;
use super::PredictionBackend;

pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com";

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("prediction API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("prediction {id} {status}: {reason}")]
    PredictionFailed {
        id: String,
        status: String,
        reason: String,
    },

    #[error("prediction {id} did not finish within {timeout:?}")]
    Timeout { id: String, timeout: Duration },

    #[error("prediction {0} succeeded without output")]
    MissingOutput(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl PredictionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PredictionStatus::Succeeded | PredictionStatus::Failed | PredictionStatus::Canceled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionStatus::Starting => "starting",
            PredictionStatus::Processing => "processing",
            PredictionStatus::Succeeded => "succeeded",
            PredictionStatus::Failed => "failed",
            PredictionStatus::Canceled => "canceled",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub urls: Option<PredictionUrls>,
}

/// Links returned with a prediction
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionUrls {
    #[serde(default)]
    pub get: Option<String>,
    #[serde(default)]
    pub cancel: Option<String>,
}

/// Client for creating and polling predictions
pub struct ReplicateClient {
    client: Client,
    base_url: String,
    api_token: String,
    poll_interval: Duration,
    prediction_timeout: Duration,
}

impl ReplicateClient {
    /// Create a new client. `request_timeout` bounds each HTTP call; use
    /// `with_polling` to bound the whole prediction.
    pub fn new(
        base_url: &str,
        api_token: &str,
        request_timeout: Duration,
    ) -> Result<Self, InferenceError> {
        let client = Client::builder().timeout(request_timeout).build()?;

        let base_url = base_url.trim_end_matches('/').to_string();
        info!("Prediction client configured: base_url={}", base_url);

        Ok(Self {
            client,
            base_url,
            api_token: api_token.to_string(),
            poll_interval: Duration::from_secs(1),
            prediction_timeout: Duration::from_secs(300),
        })
    }

    pub fn with_polling(mut self, poll_interval: Duration, prediction_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.prediction_timeout = prediction_timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the API is reachable and the token is accepted
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/v1/account", self.base_url))
            .bearer_auth(&self.api_token)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Prediction API health check failed: {}", e);
                false
            }
        }
    }

    /// Start a prediction. The API may hold the request open and return a
    /// finished prediction.
    pub async fn create_prediction(
        &self,
        model: ModelVersion,
        input: Value,
    ) -> Result<Prediction, InferenceError> {
        let url = format!("{}/v1/predictions", self.base_url);
        debug!("Create prediction POST {} model={}", url, model.name);

        let body = json!({
            "version": model.version,
            "input": input,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    /// Where to poll `prediction`: its `urls.get` link when that stays on
    /// the configured API host, otherwise the id-based path. The bearer
    /// token is never sent anywhere else.
    pub fn poll_url(&self, prediction: &Prediction) -> String {
        let prefix = format!("{}/", self.base_url);
        match prediction.urls.as_ref().and_then(|u| u.get.as_deref()) {
            Some(url) if url.starts_with(&prefix) => url.to_string(),
            Some(url) => {
                warn!("Ignoring poll URL outside {}: {}", self.base_url, url);
                format!("{}/v1/predictions/{}", self.base_url, prediction.id)
            }
            None => format!("{}/v1/predictions/{}", self.base_url, prediction.id),
        }
    }

    pub async fn get_prediction(&self, prediction: &Prediction) -> Result<Prediction, InferenceError> {
        let url = self.poll_url(prediction);
        debug!("Poll prediction GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    /// Poll until the prediction reaches a terminal status
    pub async fn wait_for(&self, mut prediction: Prediction) -> Result<Prediction, InferenceError> {
        let started = tokio::time::Instant::now();

        while !prediction.status.is_terminal() {
            if started.elapsed() >= self.prediction_timeout {
                warn!(
                    "Prediction {} still {} after {:?}",
                    prediction.id,
                    prediction.status.as_str(),
                    self.prediction_timeout
                );
                return Err(InferenceError::Timeout {
                    id: prediction.id,
                    timeout: self.prediction_timeout,
                });
            }
            tokio::time::sleep(self.poll_interval).await;
            let next = self.get_prediction(&prediction).await?;
            // Poll responses may omit links; keep the ones we were given
            prediction = Prediction {
                urls: next.urls.or(prediction.urls),
                ..next
            };
        }

        Ok(prediction)
    }
}

#[async_trait]
impl PredictionBackend for ReplicateClient {
    async fn run(&self, model: ModelVersion, input: Value) -> Result<Value, InferenceError> {
        let start = std::time::Instant::now();

        let created = self.create_prediction(model, input).await?;
        let prediction = self.wait_for(created).await?;

        match prediction.status {
            PredictionStatus::Succeeded => {
                info!(
                    "Prediction {} succeeded: model={}, {}ms",
                    prediction.id,
                    model.name,
                    start.elapsed().as_millis()
                );
                prediction
                    .output
                    .filter(|v| !v.is_null())
                    .ok_or(InferenceError::MissingOutput(prediction.id))
            }
            status => Err(InferenceError::PredictionFailed {
                id: prediction.id,
                status: status.as_str().to_string(),
                reason: prediction
                    .error
                    .map(|e| match e {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .unwrap_or_else(|| "no error reported".to_string()),
            }),
        }
    }

    async fn health_check(&self) -> bool {
        ReplicateClient::health_check(self).await
    }
}

async fn check_status(response: Response) -> Result<Response, InferenceError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(InferenceError::Upstream { status, body })
}
