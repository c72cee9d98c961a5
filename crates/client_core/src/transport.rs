use std::{error::Error as StdError, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use shared::protocol::{HealthResponse, MeasurementVector, PredictionResponse};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::{resolve_base_url, ClientSettings};

/// Raw failure of one request, before it is classified for display.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection could not be established: {0}")]
    Connect(String),
    #[error("server responded with status {status}")]
    Status {
        status: u16,
        reason: Option<String>,
        body: String,
    },
    #[error("no response received: {0}")]
    NoResponse(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        match FailureClass::of(&err) {
            FailureClass::Connect => Self::Connect(error_chain(&err)),
            FailureClass::NoResponse => Self::NoResponse(error_chain(&err)),
            FailureClass::Other => Self::Other(anyhow::Error::new(err)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureClass {
    Connect,
    NoResponse,
    Other,
}

impl FailureClass {
    fn of(err: &reqwest::Error) -> Self {
        Self::from_flags(
            err.is_timeout(),
            err.is_connect(),
            err.is_request() || err.is_body(),
        )
    }

    // An expired connect timeout reports both `timeout` and `connect`; it is a timeout.
    fn from_flags(timeout: bool, connect: bool, unanswered: bool) -> Self {
        if timeout {
            Self::NoResponse
        } else if connect {
            Self::Connect
        } else if unanswered {
            Self::NoResponse
        } else {
            Self::Other
        }
    }
}

fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
pub trait PredictionTransport: Send + Sync {
    fn endpoint(&self) -> &Url;
    async fn predict(
        &self,
        vector: &MeasurementVector,
    ) -> Result<PredictionResponse, TransportError>;
}

pub struct HttpTransport {
    http: Client,
    base_url: Url,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("failed to build HTTP client")?;
        Self::with_client(http, &settings.api_url)
    }

    pub fn with_client(http: Client, api_url: &str) -> Result<Self> {
        let base_url = resolve_base_url(api_url)?;
        let endpoint = base_url
            .join("predict")
            .with_context(|| format!("failed to resolve prediction endpoint from '{base_url}'"))?;
        Ok(Self {
            http,
            base_url,
            endpoint,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let health = self
            .http
            .get(self.base_url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("failed to reach prediction server at {}", self.base_url))?
            .error_for_status()?
            .json()
            .await
            .context("malformed health response")?;
        Ok(health)
    }
}

#[async_trait]
impl PredictionTransport for HttpTransport {
    fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn predict(
        &self,
        vector: &MeasurementVector,
    ) -> Result<PredictionResponse, TransportError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(vector)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    debug!(%err, "failed to read error response body");
                    String::new()
                }
            };
            return Err(TransportError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().map(str::to_string),
                body,
            });
        }

        // A response arrived, so a failed body read is not a missing response.
        let bytes = response
            .bytes()
            .await
            .map_err(|err| anyhow::Error::new(err).context("failed to read prediction response"))?;
        let prediction = serde_json::from_slice::<PredictionResponse>(&bytes)
            .context("malformed prediction response")?;
        Ok(prediction)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
