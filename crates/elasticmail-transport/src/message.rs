//! Outbound message model handed to a transport
//!
//! Addresses are [`lettre::message::Mailbox`] values, so display names and
//! address syntax are validated when the caller builds the message.

use std::fmt;
use std::str::FromStr;

use lettre::message::Mailbox;

use crate::errors::EmailError;

/// Two-part MIME media type (`type/subtype`)
///
/// Parameters such as `; charset=utf-8` are accepted when parsing but are not
/// kept: the provider only receives the type and subtype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    type_: String,
    subtype: String,
}

impl MediaType {
    pub fn new(type_: &str, subtype: &str) -> Result<Self, EmailError> {
        let type_ = type_.trim();
        let subtype = subtype.trim();

        if !is_token(type_) || !is_token(subtype) {
            return Err(EmailError::InvalidMediaType(format!(
                "{}/{}",
                type_, subtype
            )));
        }

        Ok(Self {
            type_: type_.to_string(),
            subtype: subtype.to_string(),
        })
    }

    pub fn type_(&self) -> &str {
        &self.type_
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_graphic() && !matches!(c, '/' | ';' | '"' | '(' | ')'))
}

impl FromStr for MediaType {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let essence = s.split(';').next().unwrap_or_default();
        let (type_, subtype) = essence
            .split_once('/')
            .ok_or_else(|| EmailError::InvalidMediaType(s.to_string()))?;

        MediaType::new(type_, subtype).map_err(|_| EmailError::InvalidMediaType(s.to_string()))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)
    }
}

/// A file embedded in the message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: MediaType,
    pub content: Vec<u8>,
}

impl Attachment {
    /// Create an attachment, parsing `content_type` as `type/subtype`
    pub fn new(
        filename: impl Into<String>,
        content_type: &str,
        content: impl Into<Vec<u8>>,
    ) -> Result<Self, EmailError> {
        Ok(Self::from_parts(filename, content_type.parse()?, content))
    }

    pub fn from_parts(
        filename: impl Into<String>,
        content_type: MediaType,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            content: content.into(),
        }
    }
}

/// A fully assembled email, ready to be dispatched by a transport
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Sender identity; its display name is kept
    pub from: Mailbox,
    pub to: Vec<Mailbox>,
    pub cc: Vec<Mailbox>,
    pub bcc: Vec<Mailbox>,
    pub reply_to: Vec<Mailbox>,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl OutboundMessage {
    pub fn new(from: Mailbox, subject: impl Into<String>) -> Self {
        Self {
            from,
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            reply_to: Vec::new(),
            subject: subject.into(),
            html: None,
            text: None,
            attachments: Vec::new(),
        }
    }

    pub fn to(mut self, mailbox: Mailbox) -> Self {
        self.to.push(mailbox);
        self
    }

    pub fn cc(mut self, mailbox: Mailbox) -> Self {
        self.cc.push(mailbox);
        self
    }

    pub fn bcc(mut self, mailbox: Mailbox) -> Self {
        self.bcc.push(mailbox);
        self
    }

    pub fn reply_to(mut self, mailbox: Mailbox) -> Self {
        self.reply_to.push(mailbox);
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn to_addresses(&self) -> Vec<String> {
        bare_addresses(&self.to)
    }

    pub fn cc_addresses(&self) -> Vec<String> {
        bare_addresses(&self.cc)
    }

    pub fn bcc_addresses(&self) -> Vec<String> {
        bare_addresses(&self.bcc)
    }

    pub fn reply_to_addresses(&self) -> Vec<String> {
        bare_addresses(&self.reply_to)
    }

    /// HTML body, treating an empty string as absent
    pub fn html_body(&self) -> Option<&str> {
        self.html.as_deref().filter(|s| !s.is_empty())
    }

    /// Plain-text body, treating an empty string as absent
    pub fn text_body(&self) -> Option<&str> {
        self.text.as_deref().filter(|s| !s.is_empty())
    }

    /// Check the message can be dispatched
    pub fn validate(&self) -> Result<(), EmailError> {
        if self.html_body().is_none() && self.text_body().is_none() {
            return Err(EmailError::Validation(
                "Message needs an HTML or plain-text body".to_string(),
            ));
        }
        Ok(())
    }
}

fn bare_addresses(mailboxes: &[Mailbox]) -> Vec<String> {
    mailboxes.iter().map(|m| m.email.to_string()).collect()
}
