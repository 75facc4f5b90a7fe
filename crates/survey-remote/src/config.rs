//! Remote persistence service configuration

use serde::{Deserialize, Serialize};
use std::env;
use survey_core::{Error, Result};
use url::Url;

/// Collection the survey records are created in
pub const DEFAULT_COLLECTION: &str = "survey_responses";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the remote record service client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    /// Deployment sub-path, already normalized (`""` or `/prefix`)
    #[serde(default)]
    pub base_path: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Normalize a deployment sub-path: leading slash added, trailing slash
/// removed, root and blank collapse to no prefix.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let with_slash = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };

    with_slash.trim_end_matches('/').to_string()
}

impl RemoteConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = env::var("SURVEY_API_URL").map_err(|_| {
            Error::Configuration("SURVEY_API_URL environment variable not found".to_string())
        })?;

        let mut config = Self::new(base_url)
            .with_base_path(&env::var("API_BASE_PATH").unwrap_or_default());

        if let Ok(collection) = env::var("SURVEY_COLLECTION") {
            config.collection = collection.trim().to_string();
        }
        config.api_key = env::var("SURVEY_API_KEY").ok().filter(|k| !k.trim().is_empty());
        if let Ok(timeout) = env::var("SURVEY_API_TIMEOUT_SECS") {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                Error::Configuration(format!("SURVEY_API_TIMEOUT_SECS must be a number, got '{}'", timeout))
            })?;
        }

        config.records_url()?;
        Ok(config)
    }

    /// Create configuration for a service origin, with defaults elsewhere
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim().trim_end_matches('/').to_string(),
            base_path: String::new(),
            collection: default_collection(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = normalize_base_path(base_path);
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn endpoint(&self, tail: &str) -> Result<Url> {
        let raw = format!("{}{}/{}", self.base_url, self.base_path, tail);
        Url::parse(&raw).map_err(|e| Error::Configuration(format!("invalid service URL '{}': {}", raw, e)))
    }

    /// Create-record endpoint
    pub fn records_url(&self) -> Result<Url> {
        if self.collection.trim().is_empty() {
            return Err(Error::Configuration("collection must not be empty".to_string()));
        }
        self.endpoint(self.collection.trim_matches('/'))
    }

    pub fn health_url(&self) -> Result<Url> {
        self.endpoint("health")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path(""), "");
        assert_eq!(normalize_base_path("  "), "");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path("survey-demo"), "/survey-demo");
        assert_eq!(normalize_base_path("/survey-demo/"), "/survey-demo");
    }

    #[test]
    fn test_endpoint_urls() {
        let config = RemoteConfig::new("https://api.example.org/").with_base_path("demo");

        assert_eq!(
            config.records_url().unwrap().as_str(),
            "https://api.example.org/demo/survey_responses"
        );
        assert_eq!(config.health_url().unwrap().as_str(), "https://api.example.org/demo/health");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(RemoteConfig::new("not a url").records_url().is_err());
        assert!(RemoteConfig::new("https://api.example.org").with_collection("").records_url().is_err());
    }
}
