//! Elastic Email v4 `POST /emails` request body
//!
//! Field names follow the provider's PascalCase schema. Empty recipient
//! categories, a missing reply-to and an empty attachment list are left out
//! of the JSON entirely rather than sent as empty values.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::message::{Attachment, OutboundMessage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmailPayload {
    pub recipients: Recipients,
    pub content: EmailContent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipients {
    #[serde(rename = "To", default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<String>,
    #[serde(rename = "CC", default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<String>,
    #[serde(rename = "BCC", default, skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmailContent {
    pub body: Vec<BodyPart>,
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<AttachmentPayload>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyContentType {
    #[serde(rename = "HTML")]
    Html,
    PlainText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BodyPart {
    pub content_type: BodyContentType,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttachmentPayload {
    /// Base64 of the raw attachment bytes
    pub binary_content: String,
    pub name: String,
    pub content_type: String,
}

impl From<&Attachment> for AttachmentPayload {
    fn from(attachment: &Attachment) -> Self {
        Self {
            binary_content: BASE64.encode(&attachment.content),
            name: attachment.filename.clone(),
            content_type: attachment.content_type.to_string(),
        }
    }
}

impl From<&OutboundMessage> for EmailPayload {
    fn from(message: &OutboundMessage) -> Self {
        let recipients = Recipients {
            to: message.to_addresses(),
            cc: message.cc_addresses(),
            bcc: message.bcc_addresses(),
        };

        // HTML first: the provider reads list order as rendering preference
        let mut body = Vec::with_capacity(2);
        if let Some(html) = message.html_body() {
            body.push(BodyPart {
                content_type: BodyContentType::Html,
                content: html.to_string(),
            });
        }
        if let Some(text) = message.text_body() {
            body.push(BodyPart {
                content_type: BodyContentType::PlainText,
                content: text.to_string(),
            });
        }

        let attachments = if message.attachments.is_empty() {
            None
        } else {
            Some(message.attachments.iter().map(AttachmentPayload::from).collect())
        };

        Self {
            recipients,
            content: EmailContent {
                body,
                from: format_from(message),
                reply_to: message.reply_to.first().map(|m| m.email.to_string()),
                subject: message.subject.clone(),
                attachments,
            },
        }
    }
}

/// `"Name <address>"` when the sender has a display name, else the bare address
fn format_from(message: &OutboundMessage) -> String {
    match message.from.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => format!("{} <{}>", name, message.from.email),
        None => message.from.email.to_string(),
    }
}
