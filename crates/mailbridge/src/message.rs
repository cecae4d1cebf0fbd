//! Simple (single-part, plain text) mail messages.

use lettre::Message;
use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A plain text email message.
///
/// Immutable once handed to the sender; the connector copies the fields
/// into the transport representation and retains nothing after the call
/// returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleMailMessage {
    /// Sender address.
    pub from: String,
    /// Primary recipients, in order.
    pub to: Vec<String>,
    /// CC recipients.
    #[serde(default)]
    pub cc: Vec<String>,
    /// BCC recipients.
    #[serde(default)]
    pub bcc: Vec<String>,
    /// Optional reply-to address.
    #[serde(default)]
    pub reply_to: Option<String>,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub text: String,
}

impl SimpleMailMessage {
    /// Creates a message with a sender and subject.
    #[must_use]
    pub fn new(from: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Adds a recipient.
    #[must_use]
    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.to.push(recipient.into());
        self
    }

    /// Adds a CC recipient.
    #[must_use]
    pub fn cc(mut self, recipient: impl Into<String>) -> Self {
        self.cc.push(recipient.into());
        self
    }

    /// Adds a BCC recipient.
    #[must_use]
    pub fn bcc(mut self, recipient: impl Into<String>) -> Self {
        self.bcc.push(recipient.into());
        self
    }

    /// Sets the reply-to address.
    #[must_use]
    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to = Some(address.into());
        self
    }

    /// Sets the plain text body.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builds the transport message with the given body text.
    ///
    /// The body is a parameter so the template path can substitute the
    /// rendered text while reusing the same envelope fields.
    pub(crate) fn to_transport_message(&self, body: &str) -> Result<Message> {
        if self.to.is_empty() {
            return Err(Error::Build("at least one recipient required".into()));
        }

        let mut builder = Message::builder()
            .from(parse_mailbox(&self.from)?)
            .subject(&self.subject);

        for to in &self.to {
            builder = builder.to(parse_mailbox(to)?);
        }
        for cc in &self.cc {
            builder = builder.cc(parse_mailbox(cc)?);
        }
        for bcc in &self.bcc {
            builder = builder.bcc(parse_mailbox(bcc)?);
        }
        if let Some(reply_to) = &self.reply_to {
            builder = builder.reply_to(parse_mailbox(reply_to)?);
        }

        builder
            .body(body.to_string())
            .map_err(|e| Error::Build(e.to_string()))
    }
}

pub(crate) fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|_| Error::InvalidAddress(address.to_string()))
}
