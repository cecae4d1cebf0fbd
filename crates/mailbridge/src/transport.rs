//! Transport seam and the lettre-backed SMTP mailer.

use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::properties::{TlsMode, TransportConfig};

/// Transport error types.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failure reported by the SMTP transport (connection, TLS setup,
    /// authentication, rejected recipient).
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Failure reported by a non-SMTP [`Transport`] implementation.
    #[error("transport rejected message: {0}")]
    Rejected(String),
}

/// Delivery backend for fully built messages.
///
/// The connector depends on delivery only through this interface; the
/// configuration resolved from the current properties travels with every
/// call. Implement it to substitute another backend (or a test double).
pub trait Transport: Send + Sync {
    /// Delivers one message. A single atomic attempt: no retries, no
    /// partial success.
    fn send(
        &self,
        message: Message,
        config: &TransportConfig,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// SMTP delivery via lettre.
///
/// The underlying transport is rebuilt from the supplied configuration on
/// every call (connect, send, disconnect), so property changes between
/// sends always take effect and no connection state outlives a send.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpMailer;

impl SmtpMailer {
    /// Creates the mailer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn build_transport(
        config: &TransportConfig,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, TransportError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port);

        builder = match config.tls {
            TlsMode::None => builder.tls(Tls::None),
            TlsMode::StartTls => {
                builder.tls(Tls::Required(TlsParameters::new(config.host.clone())?))
            }
            TlsMode::OpportunisticStartTls => {
                builder.tls(Tls::Opportunistic(TlsParameters::new(config.host.clone())?))
            }
            TlsMode::Wrapper => {
                builder.tls(Tls::Wrapper(TlsParameters::new(config.host.clone())?))
            }
        };

        if let Some(credentials) = &config.credentials {
            builder = builder.credentials(Credentials::new(
                credentials.user.clone(),
                credentials.password.clone(),
            ));
        }

        Ok(builder.build())
    }
}

impl Transport for SmtpMailer {
    async fn send(&self, message: Message, config: &TransportConfig) -> Result<(), TransportError> {
        let transport = Self::build_transport(config)?;
        tracing::debug!(host = %config.host, port = config.port, tls = ?config.tls, "Connecting to SMTP server");
        transport.send(message).await?;
        tracing::info!(host = %config.host, "Message accepted by server");
        Ok(())
    }
}
