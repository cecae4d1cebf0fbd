//! The mail sender facade.

use std::collections::HashMap;
use std::sync::RwLock;

use lettre::Message;
use mailbridge_template::{FsTemplateStore, TemplateResolver};

use crate::error::{BoxError, Error, Result};
use crate::message::SimpleMailMessage;
use crate::mime::MimeMessageBuilder;
use crate::properties::{EmailProperties, TransportConfig};
use crate::transport::{SmtpMailer, Transport};

/// Default root directory for filesystem template lookup.
const DEFAULT_TEMPLATE_ROOT: &str = "resources";

/// Email sending facade.
///
/// Holds the connection property mapping and a template resolver, and
/// delegates delivery to a [`Transport`] (SMTP via [`SmtpMailer`] by
/// default). Each send operation is one atomic attempt; nothing is
/// retained after the call returns.
///
/// The property mapping is guarded by a read-write lock: sends take a read
/// snapshot, so a [`Self::set_email_properties`] racing with an in-flight
/// send affects only subsequent sends.
pub struct EmailConnector<T = SmtpMailer> {
    properties: RwLock<EmailProperties>,
    resolver: TemplateResolver,
    transport: T,
}

impl EmailConnector<SmtpMailer> {
    /// Creates a connector delivering over SMTP, with templates resolved
    /// from the `resources` directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(SmtpMailer::new())
    }
}

impl Default for EmailConnector<SmtpMailer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> EmailConnector<T> {
    /// Creates a connector over a custom transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            properties: RwLock::new(EmailProperties::new()),
            resolver: TemplateResolver::new(FsTemplateStore::new(DEFAULT_TEMPLATE_ROOT)),
            transport,
        }
    }

    /// Replaces the template resolver.
    #[must_use]
    pub fn with_template_resolver(mut self, resolver: TemplateResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replaces the full property mapping. Never merges.
    ///
    /// No validation happens here; malformed or missing settings surface
    /// as [`Error::Configuration`] when a send is attempted.
    pub fn set_email_properties(&self, properties: EmailProperties) {
        // A poisoned lock only ever holds a fully written mapping.
        match self.properties.write() {
            Ok(mut guard) => *guard = properties,
            Err(poisoned) => *poisoned.into_inner() = properties,
        }
    }

    /// Returns a copy of the current property mapping.
    ///
    /// Mutating the returned value does not affect the connector.
    #[must_use]
    pub fn get_email_properties(&self) -> EmailProperties {
        match self.properties.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Sends a plain text message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the properties cannot be
    /// resolved, [`Error::InvalidAddress`]/[`Error::Build`] if the message
    /// cannot be assembled, or [`Error::Transport`] on delivery failure.
    pub async fn send_simple_mail_message(&self, message: &SimpleMailMessage) -> Result<()> {
        tracing::debug!(to = ?message.to, subject = %message.subject, "Sending simple message");
        let mail = message.to_transport_message(&message.text)?;
        self.deliver(mail).await
    }

    /// Sends a MIME message populated by a caller-supplied preparator.
    ///
    /// The preparator is invoked exactly once, synchronously, with an
    /// empty [`MimeMessageBuilder`]; the connector does not inspect what
    /// it does.
    ///
    /// # Errors
    ///
    /// Any error returned by the preparator is surfaced unchanged as
    /// [`Error::Preparator`], never wrapped into a transport error.
    /// Otherwise the failure modes match
    /// [`Self::send_simple_mail_message`].
    pub async fn send_mime_mail<F>(&self, preparator: F) -> Result<()>
    where
        F: FnOnce(&mut MimeMessageBuilder) -> std::result::Result<(), BoxError>,
    {
        let mut builder = MimeMessageBuilder::new();
        preparator(&mut builder).map_err(Error::Preparator)?;
        let mail = builder.build()?;
        self.deliver(mail).await
    }

    /// Sends a message whose body comes from a named template.
    ///
    /// The template is resolved with `${name}` substitution over
    /// `variables`; the rendered text replaces the message body while the
    /// envelope fields (from, to, subject) come from `message`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if resolution fails, in which case no
    /// send is attempted; callers can pattern-match it down to
    /// [`NotFound`](mailbridge_template::Error::NotFound). Otherwise the
    /// failure modes match [`Self::send_simple_mail_message`].
    pub async fn send_simple_mail_message_with_template(
        &self,
        message: &SimpleMailMessage,
        template: &str,
        variables: &HashMap<String, String>,
    ) -> Result<()> {
        let body = self.resolver.resolve(template, variables)?;
        tracing::debug!(template, to = ?message.to, "Sending templated message");
        let mail = message.to_transport_message(&body)?;
        self.deliver(mail).await
    }

    /// One atomic delivery attempt with the current properties.
    async fn deliver(&self, mail: Message) -> Result<()> {
        let config = TransportConfig::from_properties(&self.get_email_properties())?;
        if config.debug {
            tracing::debug!(
                message = %String::from_utf8_lossy(&mail.formatted()),
                "Outgoing message"
            );
        }
        self.transport.send(mail, &config).await?;
        Ok(())
    }
}
