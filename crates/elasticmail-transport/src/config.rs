//! Transport configuration

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::EmailError;

/// Elastic Email v4 send endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.elasticemail.com/v4/emails";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Settings for [`crate::ElasticEmailTransport`]
#[derive(Clone, Serialize, Deserialize)]
pub struct ElasticEmailConfig {
    pub api_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ElasticEmailConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), EmailError> {
        if self.api_key.trim().is_empty() {
            return Err(EmailError::Configuration(
                "API key must not be empty".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(EmailError::Configuration(
                "Timeout must be greater than zero".to_string(),
            ));
        }

        let url = Url::parse(&self.endpoint).map_err(|e| {
            EmailError::Configuration(format!("Invalid endpoint '{}': {}", self.endpoint, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(EmailError::Configuration(format!(
                "Endpoint must use http or https: {}",
                self.endpoint
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for ElasticEmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElasticEmailConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
