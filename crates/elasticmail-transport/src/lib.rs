//! Elastic Email transport
//!
//! Delivers an assembled [`OutboundMessage`] through the Elastic Email v4
//! HTTP API:
//! - maps the message to the provider's JSON schema
//! - performs a single authenticated POST
//! - turns any HTTP status >= 400 into an [`EmailError::Delivery`]
//!
//! Errors returned by [`EmailTransport::send`]:
//! - [`EmailError::Transport`] when the request could not be completed
//! - [`EmailError::Delivery`] when the provider answered with status >= 400
//! - [`EmailError::Validation`] when the message has neither an HTML nor a
//!   plain-text body; such a message is rejected before any request is made
//!
//! There is no retry, queuing or batching. Callers that need those wrap the
//! [`EmailTransport`] trait.

pub mod config;
pub mod errors;
pub mod message;
pub mod payload;
pub mod transports;

// Re-export main types
pub use config::{ElasticEmailConfig, DEFAULT_ENDPOINT};
pub use errors::EmailError;
pub use message::{Attachment, MediaType, OutboundMessage};
pub use payload::EmailPayload;
pub use transports::{DispatchResult, ElasticEmailTransport, EmailTransport, TransportType};

/// Re-exported so callers can build addresses without depending on lettre
pub use lettre::message::Mailbox;
pub use lettre::Address;
