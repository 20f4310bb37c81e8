//! Error types for the Elastic Email transport

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmailError {
    /// The HTTP request could not be completed (DNS, TCP, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with a status >= 400
    #[error("Elastic Email API error ({status}): {body}")]
    Delivery { status: u16, body: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid media type: {0}")]
    InvalidMediaType(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid transport type: {0}")]
    InvalidTransportType(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EmailError {
    /// True when the provider rejected the message with an HTTP error status
    pub fn is_delivery(&self) -> bool {
        matches!(self, EmailError::Delivery { .. })
    }

    /// HTTP status returned by the provider, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            EmailError::Delivery { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EmailError {
    fn from(err: serde_json::Error) -> Self {
        EmailError::Serialization(err.to_string())
    }
}

impl From<lettre::address::AddressError> for EmailError {
    fn from(err: lettre::address::AddressError) -> Self {
        EmailError::InvalidAddress(err.to_string())
    }
}

impl From<reqwest::Error> for EmailError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EmailError::Transport(format!("Request timed out: {}", err))
        } else {
            EmailError::Transport(err.to_string())
        }
    }
}
