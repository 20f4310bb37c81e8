//! Elastic Email v4 transport implementation

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::{debug, error};

use super::traits::{DispatchResult, EmailTransport, TransportType};
use crate::config::ElasticEmailConfig;
use crate::errors::EmailError;
use crate::message::OutboundMessage;
use crate::payload::EmailPayload;

/// Header carrying the account API key
pub const API_KEY_HEADER: &str = "X-ElasticEmail-ApiKey";

/// Elastic Email transport
///
/// Each [`send`](EmailTransport::send) makes exactly one POST to the
/// configured endpoint. Redirects are not followed, so a 3xx answer is
/// reported as is and the API key never reaches another host. Certificate
/// verification is left on.
#[derive(Debug)]
pub struct ElasticEmailTransport {
    client: Client,
    config: ElasticEmailConfig,
}

impl ElasticEmailTransport {
    /// Create a new transport with the given configuration
    pub fn new(config: ElasticEmailConfig) -> Result<Self, EmailError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .redirect(Policy::none())
            .user_agent(concat!("elasticmail-transport/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EmailError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create a transport for `api_key` with the default endpoint and timeout
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, EmailError> {
        Self::new(ElasticEmailConfig::new(api_key))
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

impl std::fmt::Display for ElasticEmailTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.transport_type())
    }
}

#[async_trait]
impl EmailTransport for ElasticEmailTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<DispatchResult, EmailError> {
        message.validate()?;

        let payload = serde_json::to_vec(&EmailPayload::from(message))?;

        debug!(
            "Sending email via Elastic Email from: {} ({} recipients)",
            message.from.email,
            message.to.len() + message.cc.len() + message.bcc.len()
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.config.api_key)
            .body(payload)
            .send()
            .await?;

        let status = response.status().as_u16();

        if status >= 400 {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Failed to send email via Elastic Email ({}): {}", status, body);
            return Err(EmailError::Delivery { status, body });
        }

        let body = response.text().await.unwrap_or_default();

        debug!("Email accepted by Elastic Email ({})", status);

        Ok(DispatchResult { status, body })
    }

    fn transport_type(&self) -> TransportType {
        TransportType::ElasticEmail
    }
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::message::Attachment;
    use lettre::message::Mailbox;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_KEY: &str = "test_key_12345";

    fn create_transport(mock_server: &MockServer) -> ElasticEmailTransport {
        let config = ElasticEmailConfig::new(TEST_KEY)
            .with_endpoint(format!("{}/v4/emails", mock_server.uri()));

        ElasticEmailTransport::new(config).unwrap()
    }

    fn mailbox(s: &str) -> Mailbox {
        s.parse().unwrap()
    }

    fn test_message() -> OutboundMessage {
        OutboundMessage::new(mailbox("Jane Doe <jane@x.com>"), "Welcome")
            .to(mailbox("Alice <alice@example.com>"))
            .html("<p>hi</p>")
            .text("hi")
    }

    #[tokio::test]
    async fn test_send_posts_payload_with_api_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v4/emails"))
            .and(header("X-ElasticEmail-ApiKey", TEST_KEY))
            .and(header("Content-Type", "application/json"))
            .and(body_json(serde_json::json!({
                "Recipients": { "To": ["alice@example.com"] },
                "Content": {
                    "Body": [
                        { "ContentType": "HTML", "Content": "<p>hi</p>" },
                        { "ContentType": "PlainText", "Content": "hi" }
                    ],
                    "From": "Jane Doe <jane@x.com>",
                    "Subject": "Welcome"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "TransactionID": "abc-123",
                "MessageID": "msg-1"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server);
        let result = transport.send(&test_message()).await.unwrap();

        assert_eq!(result.status, 200);
        assert!(result.body.contains("abc-123"));
    }

    #[tokio::test]
    async fn test_send_with_attachment_and_reply_to() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v4/emails"))
            .and(body_json(serde_json::json!({
                "Recipients": {
                    "To": ["alice@example.com"],
                    "CC": ["carol@example.com"]
                },
                "Content": {
                    "Body": [{ "ContentType": "PlainText", "Content": "see attached" }],
                    "From": "sender@example.com",
                    "ReplyTo": "support@example.com",
                    "Subject": "Report",
                    "Attachments": [
                        { "BinaryContent": "YWJj", "Name": "f.txt", "ContentType": "text/plain" }
                    ]
                }
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let message = OutboundMessage::new(mailbox("sender@example.com"), "Report")
            .to(mailbox("alice@example.com"))
            .cc(mailbox("Carol <carol@example.com>"))
            .reply_to(mailbox("Support <support@example.com>"))
            .text("see attached")
            .attachment(Attachment::new("f.txt", "text/plain", b"abc".to_vec()).unwrap());

        let transport = create_transport(&mock_server);
        let result = transport.send(&message).await.unwrap();

        assert_eq!(result.status, 200);
    }

    #[tokio::test]
    async fn test_success_body_is_not_parsed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v4/emails"))
            .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server);
        let result = transport.send(&test_message()).await.unwrap();

        assert_eq!(result.body, "definitely not json");
    }

    #[tokio::test]
    async fn test_unauthorized_is_delivery_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v4/emails"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server);
        let err = transport.send(&test_message()).await.unwrap_err();

        assert!(err.to_string().contains("Unauthorized"));
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v4/emails"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server);
        let err = transport.send(&test_message()).await.unwrap_err();

        match err {
            EmailError::Delivery { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "Service Unavailable");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_with_success_looking_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v4/emails"))
            .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"Success":true}"#))
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server);
        let err = transport.send(&test_message()).await.unwrap_err();

        assert!(err.is_delivery());
        assert!(err.to_string().contains(r#"{"Success":true}"#));
    }

    #[tokio::test]
    async fn test_redirect_is_reported_not_followed() {
        let mock_server = MockServer::start().await;
        let other_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v4/emails"))
            .respond_with(
                ResponseTemplate::new(307)
                    .insert_header("Location", format!("{}/elsewhere", other_server.uri())),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .expect(0)
            .mount(&other_server)
            .await;

        let transport = create_transport(&mock_server);
        let result = transport.send(&test_message()).await.unwrap();

        assert_eq!(result.status, 307);
        assert!(other_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_not_modified_status_is_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v4/emails"))
            .respond_with(ResponseTemplate::new(304))
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server);
        let result = transport.send(&test_message()).await.unwrap();

        assert_eq!(result.status, 304);
    }

    #[tokio::test]
    async fn test_message_without_body_is_rejected_before_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let message = OutboundMessage::new(mailbox("sender@example.com"), "Empty")
            .to(mailbox("alice@example.com"));

        let transport = create_transport(&mock_server);
        let result = transport.send(&message).await;

        assert!(matches!(result, Err(EmailError::Validation(_))));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&mock_server)
            .await;

        let config = ElasticEmailConfig::new(TEST_KEY)
            .with_endpoint(format!("{}/v4/emails", mock_server.uri()))
            .with_timeout_secs(1);
        let transport = ElasticEmailTransport::new(config).unwrap();

        let err = transport.send(&test_message()).await.unwrap_err();

        assert!(matches!(err, EmailError::Transport(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Nothing listens on port 1
        let config =
            ElasticEmailConfig::new(TEST_KEY).with_endpoint("http://127.0.0.1:1/v4/emails");
        let transport = ElasticEmailTransport::new(config).unwrap();

        let err = transport.send(&test_message()).await.unwrap_err();

        assert!(matches!(err, EmailError::Transport(_)));
        assert_eq!(err.status(), None);
    }
}
