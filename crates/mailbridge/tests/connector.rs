//! Integration tests for the email connector.
//!
//! These tests use a recording transport to capture delivered messages
//! without requiring a real SMTP server.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

use lettre::Message;

use mailbridge::{
    ConfigError, EmailConnector, EmailProperties, Error, MemoryTemplateStore, SimpleMailMessage,
    TemplateError, TemplateResolver, Transport, TransportConfig, TransportError, keys,
};

/// A message captured by the recording transport.
#[derive(Debug, Clone)]
struct SentMail {
    from: Option<String>,
    to: Vec<String>,
    formatted: String,
    config: TransportConfig,
}

/// Transport double that records instead of delivering.
#[derive(Clone, Default)]
struct RecordingTransport {
    sent: Arc<Mutex<Vec<SentMail>>>,
    fail_with: Option<String>,
}

impl RecordingTransport {
    fn new() -> Self {
        Self::default()
    }

    fn failing(reason: &str) -> Self {
        Self {
            sent: Arc::default(),
            fail_with: Some(reason.to_string()),
        }
    }

    fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, message: Message, config: &TransportConfig) -> Result<(), TransportError> {
        if let Some(reason) = &self.fail_with {
            return Err(TransportError::Rejected(reason.clone()));
        }
        let envelope = message.envelope();
        self.sent.lock().unwrap().push(SentMail {
            from: envelope.from().map(ToString::to_string),
            to: envelope.to().iter().map(ToString::to_string).collect(),
            formatted: String::from_utf8(message.formatted()).unwrap(),
            config: config.clone(),
        });
        Ok(())
    }
}

/// Installs a subscriber once so debug-level connector logs are visible
/// under `--nocapture`.
fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("mailbridge=debug")
            .with_test_writer()
            .try_init();
    });
}

fn connector_with(transport: RecordingTransport) -> EmailConnector<RecordingTransport> {
    let connector = EmailConnector::with_transport(transport);
    connector.set_email_properties(
        EmailProperties::new().with(keys::SMTP_HOST, "smtp.example.com"),
    );
    connector
}

fn invitation_resolver() -> TemplateResolver {
    TemplateResolver::new(MemoryTemplateStore::new().with(
        "templates/invitationtemplate",
        "Hi ${user}, you are invited!",
    ))
}

#[test]
fn test_set_and_get_email_properties() {
    let connector = EmailConnector::with_transport(RecordingTransport::new());

    let properties = EmailProperties::new()
        .with(keys::SMTP_AUTH, "true")
        .with(keys::STARTTLS_ENABLE, "true")
        .with("mail.smtp.quitwait", "false")
        .with(keys::SOCKET_FACTORY_CLASS, "javax.net.ssl.SSLSocketFactory")
        .with(keys::SOCKET_FACTORY_FALLBACK, "true")
        .with(keys::DEBUG, "true")
        .with(keys::TRANSPORT_PROTOCOL, "smtps");
    connector.set_email_properties(properties.clone());

    let read_back = connector.get_email_properties();
    assert_eq!(read_back, properties);
    assert_eq!(read_back.get(keys::TRANSPORT_PROTOCOL), Some("smtps"));
    assert_eq!(read_back.get(keys::SOCKET_FACTORY_FALLBACK), Some("true"));
}

#[test]
fn test_get_email_properties_is_a_defensive_copy() {
    let connector = EmailConnector::with_transport(RecordingTransport::new());
    connector
        .set_email_properties(EmailProperties::new().with(keys::SMTP_HOST, "smtp.example.com"));

    let mut copy = connector.get_email_properties();
    copy.set(keys::SMTP_HOST, "evil.example.com");
    copy.set(keys::DEBUG, "true");

    let current = connector.get_email_properties();
    assert_eq!(current.get(keys::SMTP_HOST), Some("smtp.example.com"));
    assert_eq!(current.get(keys::DEBUG), None);
}

#[test]
fn test_set_email_properties_replaces_not_merges() {
    let connector = EmailConnector::with_transport(RecordingTransport::new());
    connector.set_email_properties(
        EmailProperties::new()
            .with(keys::SMTP_HOST, "smtp.example.com")
            .with(keys::DEBUG, "true"),
    );
    connector
        .set_email_properties(EmailProperties::new().with(keys::SMTP_HOST, "other.example.com"));

    let current = connector.get_email_properties();
    assert_eq!(current.get(keys::SMTP_HOST), Some("other.example.com"));
    assert_eq!(current.get(keys::DEBUG), None);
    assert_eq!(current.len(), 1);
}

#[tokio::test]
async fn test_send_simple_mail_message_delivers_fields() {
    let transport = RecordingTransport::new();
    let connector = connector_with(transport.clone());

    let message = SimpleMailMessage::new("sender@example.com", "testing mail")
        .to("recipient@example.com")
        .text("hello world!!!");
    connector.send_simple_mail_message(&message).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].from.as_deref(), Some("sender@example.com"));
    assert_eq!(sent[0].to, vec!["recipient@example.com"]);
    assert!(sent[0].formatted.contains("Subject: testing mail"));
    assert!(sent[0].formatted.contains("hello world!!!"));
}

#[tokio::test]
async fn test_send_with_template_renders_body() {
    let transport = RecordingTransport::new();
    let connector = connector_with(transport.clone()).with_template_resolver(invitation_resolver());

    let message = SimpleMailMessage::new("sender@example.com", "You Are Invited")
        .to("recipient@example.com");
    let mut variables = HashMap::new();
    variables.insert("user".to_string(), "Mike".to_string());

    connector
        .send_simple_mail_message_with_template(&message, "templates/invitationtemplate", &variables)
        .await
        .unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].formatted.contains("Hi Mike, you are invited!"));
    assert!(!sent[0].formatted.contains("${user}"));
}

#[tokio::test]
async fn test_missing_template_is_typed_and_skips_send() {
    let transport = RecordingTransport::new();
    let connector = connector_with(transport.clone())
        .with_template_resolver(TemplateResolver::new(MemoryTemplateStore::new()));

    let message =
        SimpleMailMessage::new("sender@example.com", "hi").to("recipient@example.com");
    let err = connector
        .send_simple_mail_message_with_template(&message, "templates/absent", &HashMap::new())
        .await
        .unwrap_err();

    assert!(err.is_template_not_found());
    assert!(matches!(
        err,
        Error::Template(TemplateError::NotFound { name }) if name == "templates/absent"
    ));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_send_mime_mail_with_attachment() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("two.xml");
    std::fs::write(&path, b"<two/>").unwrap();

    let transport = RecordingTransport::new();
    let connector = connector_with(transport.clone());

    connector
        .send_mime_mail(|mail| {
            mail.from("sender@example.com")
                .to("recipient@example.com")
                .subject("testing mail service")
                .text("hi hello mime message!!!")
                .attach_file("myfile", &path)?;
            Ok(())
        })
        .await
        .unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let formatted = &sent[0].formatted;
    assert!(formatted.contains("multipart/mixed"));
    assert!(formatted.contains("hi hello mime message!!!"));
    assert!(formatted.contains("Content-Disposition: attachment"));
    assert!(formatted.contains("filename=\"myfile\""));

    let text_at = formatted.find("hi hello mime message!!!").unwrap();
    let attachment_at = formatted.find("Content-Disposition: attachment").unwrap();
    assert!(text_at < attachment_at, "text part precedes the attachment");
}

#[tokio::test]
async fn test_send_mime_mail_with_inline_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pic.jpg");
    std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

    let transport = RecordingTransport::new();
    let connector = connector_with(transport.clone());

    connector
        .send_mime_mail(|mail| {
            mail.from("sender@example.com")
                .to("recipient@example.com")
                .subject("testing mail service")
                .html_part(
                    "<html>Hi there,<br>See this cool pic: <img src=\"cid:AbcXyz123\"/></html>",
                )
                .attach_inline_file("AbcXyz123", "image/jpeg", &path)?;
            Ok(())
        })
        .await
        .unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let formatted = &sent[0].formatted;
    assert!(formatted.contains("multipart/related"));
    assert!(formatted.contains("Content-ID: <AbcXyz123>"));
    assert!(formatted.contains("Content-Disposition: inline"));

    let html_at = formatted.find("cid:AbcXyz123").unwrap();
    let image_at = formatted.find("Content-ID: <AbcXyz123>").unwrap();
    assert!(html_at < image_at, "HTML part precedes the inline part");
}

#[tokio::test]
async fn test_mail_debug_logs_and_still_delivers() {
    init_tracing();

    let transport = RecordingTransport::new();
    let connector = EmailConnector::with_transport(transport.clone());
    connector.set_email_properties(
        EmailProperties::new()
            .with(keys::SMTP_HOST, "smtp.example.com")
            .with(keys::DEBUG, "true"),
    );

    let message = SimpleMailMessage::new("sender@example.com", "testing mail")
        .to("recipient@example.com")
        .text("hello world!!!");
    connector.send_simple_mail_message(&message).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].config.debug, "debug flag reaches the transport");
    assert!(sent[0].formatted.contains("hello world!!!"));
}

#[tokio::test]
async fn test_preparator_error_propagates_unchanged() {
    #[derive(Debug, thiserror::Error)]
    #[error("could not read attachment source")]
    struct CallerError;

    let transport = RecordingTransport::new();
    let connector = connector_with(transport.clone());

    let err = connector
        .send_mime_mail(|_mail| Err(CallerError.into()))
        .await
        .unwrap_err();

    let Error::Preparator(inner) = err else {
        panic!("expected preparator variant, got {err:?}");
    };
    assert!(inner.downcast_ref::<CallerError>().is_some());
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_missing_host_is_a_configuration_error() {
    let transport = RecordingTransport::new();
    let connector = EmailConnector::with_transport(transport.clone());

    let message =
        SimpleMailMessage::new("sender@example.com", "hi").to("recipient@example.com");
    let err = connector.send_simple_mail_message(&message).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Configuration(ConfigError::MissingProperty {
            key: keys::SMTP_HOST
        })
    ));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_transport_failure_surfaces_as_transport_error() {
    let connector = connector_with(RecordingTransport::failing("550 mailbox unavailable"));

    let message =
        SimpleMailMessage::new("sender@example.com", "hi").to("recipient@example.com");
    let err = connector.send_simple_mail_message(&message).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Transport(TransportError::Rejected(reason)) if reason == "550 mailbox unavailable"
    ));
}

#[tokio::test]
async fn test_properties_are_applied_at_send_time() {
    let transport = RecordingTransport::new();
    let connector = EmailConnector::with_transport(transport.clone());
    let message =
        SimpleMailMessage::new("sender@example.com", "hi").to("recipient@example.com");

    connector
        .set_email_properties(EmailProperties::new().with(keys::SMTP_HOST, "first.example.com"));
    connector.send_simple_mail_message(&message).await.unwrap();

    connector.set_email_properties(
        EmailProperties::new()
            .with(keys::SMTP_HOST, "second.example.com")
            .with(keys::TRANSPORT_PROTOCOL, "smtps"),
    );
    connector.send_simple_mail_message(&message).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].config.host, "first.example.com");
    assert_eq!(sent[1].config.host, "second.example.com");
    assert_eq!(sent[1].config.port, 465);
}
