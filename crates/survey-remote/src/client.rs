//! HTTP client for the hosted record service

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use survey_core::{Error, RecordStore, Result, SurveyRecord};

use crate::config::RemoteConfig;

/// Record service client
pub struct RemoteRecordStore {
    config: RemoteConfig,
    client: Client,
}

#[derive(Serialize)]
struct CreateRecordRequest<'a> {
    #[serde(flatten)]
    record: &'a SurveyRecord,
    /// Client-side id so the service can spot duplicate deliveries
    submission_id: String,
}

#[derive(Deserialize)]
struct CreateRecordResponse {
    #[serde(default)]
    id: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

impl RemoteRecordStore {
    /// Create a new client from configuration
    pub fn new(config: RemoteConfig) -> Result<Self> {
        config.records_url()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = RemoteConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Ping the backend's health endpoint
    pub async fn health(&self) -> Result<()> {
        let url = self.config.health_url()?;
        let response = self
            .authorize(self.client.get(url.clone()))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                message: format!("health check at {} failed", url),
            });
        }

        let health: HealthResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        if health.status != "ok" {
            return Err(Error::Remote {
                status: status.as_u16(),
                message: format!("service reports status '{}'", health.status),
            });
        }

        debug!(url = %url, "record service healthy");
        Ok(())
    }
}

fn record_id(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl RecordStore for RemoteRecordStore {
    async fn create(&self, record: &SurveyRecord) -> Result<Option<String>> {
        let url = self.config.records_url()?;
        let request = CreateRecordRequest {
            record,
            submission_id: uuid::Uuid::new_v4().to_string(),
        };

        debug!(url = %url, submission_id = %request.submission_id, "creating survey record");

        let response = self
            .authorize(self.client.post(url))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !status.is_success() {
            let message = match body.trim() {
                "" => status.canonical_reason().unwrap_or("request failed").to_string(),
                text => text.to_string(),
            };
            warn!(status = status.as_u16(), "record service rejected the record");
            return Err(Error::Remote {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<CreateRecordResponse>(&body) {
            Ok(parsed) => Ok(parsed.id.and_then(record_id)),
            Err(e) => {
                debug!(error = %e, "create response carried no readable id");
                Ok(None)
            }
        }
    }
}
