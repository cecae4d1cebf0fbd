//! # mailbridge
//!
//! An SMTP email connector. Sends plain text, HTML, and templated mail with
//! attachments and inline images by wrapping the [lettre](https://lettre.rs)
//! transport and a small template-resolution layer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailbridge::{keys, EmailConnector, EmailProperties, SimpleMailMessage};
//!
//! let connector = EmailConnector::new();
//! connector.set_email_properties(
//!     EmailProperties::new()
//!         .with(keys::SMTP_HOST, "smtp.example.com")
//!         .with(keys::SMTP_AUTH, "true")
//!         .with(keys::SMTP_USER, "sender@example.com")
//!         .with(keys::SMTP_PASSWORD, "secret")
//!         .with(keys::STARTTLS_ENABLE, "true"),
//! );
//!
//! let message = SimpleMailMessage::new("sender@example.com", "testing mail")
//!     .to("recipient@example.com")
//!     .text("hello world!!!");
//! connector.send_simple_mail_message(&message).await?;
//! ```
//!
//! ## Message shapes
//!
//! Three paths lead to a send:
//!
//! - [`EmailConnector::send_simple_mail_message`]: a plain
//!   [`SimpleMailMessage`], copied field for field.
//! - [`EmailConnector::send_mime_mail`]: a caller-supplied preparator
//!   closure populates a [`MimeMessageBuilder`] (multipart structure,
//!   attachments, inline images referenced by `cid:` URIs).
//! - [`EmailConnector::send_simple_mail_message_with_template`]: the body
//!   comes from a named template with `${name}` variable substitution.
//!
//! ## Configuration
//!
//! Connection settings are a JavaMail-style string property mapping
//! ([`EmailProperties`]), replaced wholesale via
//! [`EmailConnector::set_email_properties`] and resolved into a typed
//! [`TransportConfig`] at send time. Unrecognized keys pass through to the
//! configuration's extension map untouched.
//!
//! Each send is one atomic attempt: connect, send, disconnect. There is no
//! retry loop, no queue, and no delivery-status persistence.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod connector;
mod error;
mod message;
mod mime;
mod properties;
mod transport;

pub use connector::EmailConnector;
pub use error::{BoxError, Error, Result};
pub use message::SimpleMailMessage;
pub use mime::MimeMessageBuilder;
pub use properties::{ConfigError, EmailProperties, SmtpCredentials, TlsMode, TransportConfig, keys};
pub use transport::{SmtpMailer, Transport, TransportError};

// Template layer, re-exported so connector users need only one dependency.
pub use mailbridge_template::{
    Error as TemplateError, FsTemplateStore, MemoryTemplateStore, MissingVariables,
    TemplateResolver, TemplateStore,
};
