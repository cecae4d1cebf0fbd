//! MIME message assembly: multipart bodies, attachments, inline content.

use std::io;
use std::path::Path;

use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Body, MultiPart, SinglePart};

use crate::error::{Error, Result};
use crate::message::parse_mailbox;

/// One body part of a MIME message, kept in insertion order.
#[derive(Debug, Clone)]
enum BodyPart {
    /// Text content with an explicit MIME type (`text/plain`, `text/html`).
    Text { content: String, mime_type: String },
    /// Attached content, `Content-Disposition: attachment`.
    Attachment {
        file_name: String,
        content_type: String,
        content: Vec<u8>,
    },
    /// Inline content referenced from a sibling HTML part via `cid:<id>`,
    /// `Content-Disposition: inline`. Always carries a Content-ID.
    Inline {
        content_id: String,
        content_type: String,
        content: Vec<u8>,
    },
}

/// Mutable message handle populated by a preparator closure.
///
/// The connector constructs an empty builder, hands it to the caller's
/// closure exactly once, and sends whatever the closure built. Parts are
/// emitted in insertion order: the first part added is the first MIME body
/// part. When any inline part is present the message is
/// `multipart/related`, otherwise `multipart/mixed`; with no parts at all
/// it is a single-part plain text message.
///
/// ```ignore
/// connector.send_mime_mail(|mail| {
///     mail.from("sender@example.com")
///         .to("recipient@example.com")
///         .subject("testing mail service")
///         .html_part(r#"<html>See this pic: <img src="cid:AbcXyz123"/></html>"#)
///         .attach_inline_file("AbcXyz123", "image/jpeg", "photo.jpg")?;
///     Ok(())
/// }).await?;
/// ```
#[derive(Debug, Default)]
pub struct MimeMessageBuilder {
    from: Option<String>,
    reply_to: Option<String>,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    subject: Option<String>,
    text: Option<String>,
    parts: Vec<BodyPart>,
}

impl MimeMessageBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender address.
    pub fn from(&mut self, address: impl Into<String>) -> &mut Self {
        self.from = Some(address.into());
        self
    }

    /// Sets the reply-to address.
    pub fn reply_to(&mut self, address: impl Into<String>) -> &mut Self {
        self.reply_to = Some(address.into());
        self
    }

    /// Adds a recipient.
    pub fn to(&mut self, address: impl Into<String>) -> &mut Self {
        self.to.push(address.into());
        self
    }

    /// Adds a CC recipient.
    pub fn cc(&mut self, address: impl Into<String>) -> &mut Self {
        self.cc.push(address.into());
        self
    }

    /// Adds a BCC recipient.
    pub fn bcc(&mut self, address: impl Into<String>) -> &mut Self {
        self.bcc.push(address.into());
        self
    }

    /// Sets the subject line.
    pub fn subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the plain text body. When parts are also added, the text
    /// becomes the first MIME body part.
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    /// Appends a text part with an explicit MIME type.
    pub fn text_part(
        &mut self,
        content: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> &mut Self {
        self.parts.push(BodyPart::Text {
            content: content.into(),
            mime_type: mime_type.into(),
        });
        self
    }

    /// Appends an HTML part.
    pub fn html_part(&mut self, html: impl Into<String>) -> &mut Self {
        self.text_part(html, "text/html")
    }

    /// Appends an attachment from raw bytes.
    pub fn attach(
        &mut self,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        content: Vec<u8>,
    ) -> &mut Self {
        self.parts.push(BodyPart::Attachment {
            file_name: file_name.into(),
            content_type: content_type.into(),
            content,
        });
        self
    }

    /// Appends an attachment read from a file.
    ///
    /// The content type is `application/octet-stream`; use [`Self::attach`]
    /// to supply one. No MIME sniffing is performed.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub fn attach_file(
        &mut self,
        file_name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> io::Result<&mut Self> {
        let content = std::fs::read(path)?;
        Ok(self.attach(file_name, "application/octet-stream", content))
    }

    /// Appends inline content with a Content-ID.
    ///
    /// `content_id` is the bare identifier without angle brackets; the
    /// emitted header is `Content-ID: <id>` and a sibling HTML part
    /// references it as `cid:id`.
    pub fn attach_inline(
        &mut self,
        content_id: impl Into<String>,
        content_type: impl Into<String>,
        content: Vec<u8>,
    ) -> &mut Self {
        self.parts.push(BodyPart::Inline {
            content_id: content_id.into(),
            content_type: content_type.into(),
            content,
        });
        self
    }

    /// Appends inline content read from a file.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub fn attach_inline_file(
        &mut self,
        content_id: impl Into<String>,
        content_type: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> io::Result<&mut Self> {
        let content = std::fs::read(path)?;
        Ok(self.attach_inline(content_id, content_type, content))
    }

    /// Assembles the transport message.
    pub(crate) fn build(self) -> Result<Message> {
        let from = self
            .from
            .as_deref()
            .ok_or_else(|| Error::Build("from address required".into()))?;
        if self.to.is_empty() {
            return Err(Error::Build("at least one recipient required".into()));
        }

        let mut builder = Message::builder().from(parse_mailbox(from)?);
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
        builder = builder.subject(self.subject.as_deref().unwrap_or_default());

        if self.parts.is_empty() {
            return builder
                .body(self.text.unwrap_or_default())
                .map_err(|e| Error::Build(e.to_string()));
        }

        let related = self
            .parts
            .iter()
            .any(|p| matches!(p, BodyPart::Inline { .. }));
        let multipart_builder = if related {
            MultiPart::related()
        } else {
            MultiPart::mixed()
        };

        // `parts` is non-empty past the early return above, so there is
        // always a first part to seed the multipart with.
        let mut parts = self.parts;
        let first = match self.text {
            Some(text) => SinglePart::plain(text),
            None => to_single_part(parts.remove(0))?,
        };
        let mut multipart = multipart_builder.singlepart(first);
        for part in parts {
            multipart = multipart.singlepart(to_single_part(part)?);
        }

        builder
            .multipart(multipart)
            .map_err(|e| Error::Build(e.to_string()))
    }
}

fn parse_content_type(raw: &str) -> Result<ContentType> {
    ContentType::parse(raw).map_err(|_| Error::Build(format!("invalid content type `{raw}`")))
}

fn to_single_part(part: BodyPart) -> Result<SinglePart> {
    match part {
        BodyPart::Text { content, mime_type } => Ok(SinglePart::builder()
            .header(parse_content_type(&mime_type)?)
            .body(content)),
        BodyPart::Attachment {
            file_name,
            content_type,
            content,
        } => Ok(Attachment::new(file_name)
            .body(Body::new(content), parse_content_type(&content_type)?)),
        BodyPart::Inline {
            content_id,
            content_type,
            content,
        } => Ok(Attachment::new_inline(content_id)
            .body(Body::new(content), parse_content_type(&content_type)?)),
    }
}
