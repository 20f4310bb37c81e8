//! Transport trait definitions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::EmailError;
use crate::message::OutboundMessage;

/// Supported transport types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    /// Elastic Email v4 HTTP API
    ElasticEmail,
}

impl std::fmt::Display for TransportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportType::ElasticEmail => write!(f, "elasticemail"),
        }
    }
}

impl std::str::FromStr for TransportType {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "elasticemail" | "elastic_email" | "elastic-email" | "elastic" => {
                Ok(TransportType::ElasticEmail)
            }
            _ => Err(EmailError::InvalidTransportType(s.to_string())),
        }
    }
}

/// Outcome of a dispatched message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    /// HTTP status returned by the provider
    pub status: u16,
    /// Raw response body, not parsed
    pub body: String,
}

/// A transport hands an assembled message to a delivery service
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Dispatch one message; a single attempt, never retried
    async fn send(&self, message: &OutboundMessage) -> Result<DispatchResult, EmailError>;

    /// Get the transport type
    fn transport_type(&self) -> TransportType;
}
