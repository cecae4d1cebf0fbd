//! SMTP connection properties and send-time configuration.
//!
//! Connection settings travel as a JavaMail-style string mapping
//! ([`EmailProperties`]). Nothing is validated when properties are set;
//! the mapping is resolved into a typed [`TransportConfig`] when a send is
//! attempted, and that is where malformed or missing settings surface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Recognized property keys.
///
/// Keys outside this set are carried through to
/// [`TransportConfig::extensions`] without interpretation.
pub mod keys {
    /// SMTP server hostname. Required at send time.
    pub const SMTP_HOST: &str = "mail.smtp.host";
    /// SMTP server port. Defaults from the TLS mode when absent.
    pub const SMTP_PORT: &str = "mail.smtp.port";
    /// Username for authentication.
    pub const SMTP_USER: &str = "mail.smtp.user";
    /// Password for authentication.
    pub const SMTP_PASSWORD: &str = "mail.smtp.password";
    /// Enables authentication (`true`/`false`).
    pub const SMTP_AUTH: &str = "mail.smtp.auth";
    /// Requires a STARTTLS upgrade (`true`/`false`).
    pub const STARTTLS_ENABLE: &str = "mail.smtp.starttls.enable";
    /// Socket factory class name; an SSL factory selects implicit TLS.
    pub const SOCKET_FACTORY_CLASS: &str = "mail.smtp.socketFactory.class";
    /// Allows falling back to a plain connection (`true`/`false`).
    pub const SOCKET_FACTORY_FALLBACK: &str = "mail.smtp.socketFactory.fallback";
    /// Logs outgoing messages at debug level (`true`/`false`).
    pub const DEBUG: &str = "mail.debug";
    /// Transport protocol: `smtp` or `smtps`.
    pub const TRANSPORT_PROTOCOL: &str = "mail.transport.protocol";

    pub(super) const RECOGNIZED: &[&str] = &[
        SMTP_HOST,
        SMTP_PORT,
        SMTP_USER,
        SMTP_PASSWORD,
        SMTP_AUTH,
        STARTTLS_ENABLE,
        SOCKET_FACTORY_CLASS,
        SOCKET_FACTORY_FALLBACK,
        DEBUG,
        TRANSPORT_PROTOCOL,
    ];
}

/// Configuration error types, surfaced at send time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A property required by the current settings is absent.
    #[error("missing required property `{key}`")]
    MissingProperty {
        /// The absent key.
        key: &'static str,
    },

    /// A property value could not be parsed.
    #[error("invalid value `{value}` for property `{key}`")]
    InvalidProperty {
        /// The offending key.
        key: &'static str,
        /// The unparseable value.
        value: String,
    },

    /// `mail.transport.protocol` named a protocol other than `smtp`/`smtps`.
    #[error("unsupported transport protocol `{value}`")]
    UnsupportedProtocol {
        /// The rejected protocol name.
        value: String,
    },
}

/// Free-form SMTP connection property mapping.
///
/// Keys are transport-specific settings (see [`keys`]); values are strings.
/// The mapping is pass-through storage: no validation happens here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailProperties {
    entries: BTreeMap<String, String>,
}

impl EmailProperties {
    /// Creates an empty property mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Sets a property, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Gets a property value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterates over all key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of properties set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no properties are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get_bool(&self, key: &'static str) -> Result<bool, ConfigError> {
        match self.get(key) {
            None => Ok(false),
            Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
            Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
            Some(v) => Err(ConfigError::InvalidProperty {
                key,
                value: v.to_string(),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EmailProperties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// How the connection to the server is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// Plain connection, no TLS.
    None,
    /// Plain connection upgraded with STARTTLS; fails if unavailable.
    StartTls,
    /// STARTTLS when the server offers it, plain otherwise.
    OpportunisticStartTls,
    /// TLS from the first byte (implicit TLS / SMTPS).
    Wrapper,
}

impl TlsMode {
    /// Conventional port for this mode.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::None => 25,
            Self::StartTls | Self::OpportunisticStartTls => 587,
            Self::Wrapper => 465,
        }
    }
}

/// Credentials for SMTP authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    /// Username.
    pub user: String,
    /// Password.
    pub password: String,
}

/// Typed transport configuration, resolved from [`EmailProperties`] at
/// send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Connection security mode.
    pub tls: TlsMode,
    /// Credentials, present only when `mail.smtp.auth` is `true`.
    pub credentials: Option<SmtpCredentials>,
    /// Log outgoing messages at debug level.
    pub debug: bool,
    /// Unrecognized properties, passed through uninterpreted.
    pub extensions: BTreeMap<String, String>,
}

impl TransportConfig {
    /// Resolves a property mapping into a transport configuration.
    ///
    /// TLS mode is derived from `mail.transport.protocol` (`smtps` selects
    /// implicit TLS), the socket factory class (an `SSLSocketFactory`
    /// likewise selects implicit TLS), and `mail.smtp.starttls.enable`
    /// (with `mail.smtp.socketFactory.fallback` downgrading required
    /// STARTTLS to opportunistic).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingProperty`] when the host is absent or
    /// auth is enabled without credentials,
    /// [`ConfigError::InvalidProperty`] for unparseable booleans or port,
    /// and [`ConfigError::UnsupportedProtocol`] for a protocol other than
    /// `smtp`/`smtps`.
    pub fn from_properties(properties: &EmailProperties) -> Result<Self, ConfigError> {
        let host = properties
            .get(keys::SMTP_HOST)
            .ok_or(ConfigError::MissingProperty {
                key: keys::SMTP_HOST,
            })?
            .to_string();

        let ssl_factory = properties
            .get(keys::SOCKET_FACTORY_CLASS)
            .is_some_and(|class| class.ends_with("SSLSocketFactory"));

        let tls = match properties.get(keys::TRANSPORT_PROTOCOL).unwrap_or("smtp") {
            "smtps" => TlsMode::Wrapper,
            "smtp" if ssl_factory => TlsMode::Wrapper,
            "smtp" => {
                let starttls = properties.get_bool(keys::STARTTLS_ENABLE)?;
                let fallback = properties.get_bool(keys::SOCKET_FACTORY_FALLBACK)?;
                match (starttls, fallback) {
                    (true, true) => TlsMode::OpportunisticStartTls,
                    (true, false) => TlsMode::StartTls,
                    (false, _) => TlsMode::None,
                }
            }
            other => {
                return Err(ConfigError::UnsupportedProtocol {
                    value: other.to_string(),
                });
            }
        };

        let port = match properties.get(keys::SMTP_PORT) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidProperty {
                key: keys::SMTP_PORT,
                value: raw.to_string(),
            })?,
            None => tls.default_port(),
        };

        let credentials = if properties.get_bool(keys::SMTP_AUTH)? {
            let user = properties
                .get(keys::SMTP_USER)
                .ok_or(ConfigError::MissingProperty {
                    key: keys::SMTP_USER,
                })?;
            let password =
                properties
                    .get(keys::SMTP_PASSWORD)
                    .ok_or(ConfigError::MissingProperty {
                        key: keys::SMTP_PASSWORD,
                    })?;
            Some(SmtpCredentials {
                user: user.to_string(),
                password: password.to_string(),
            })
        } else {
            None
        };

        let debug = properties.get_bool(keys::DEBUG)?;

        let extensions = properties
            .iter()
            .filter(|(k, _)| !keys::RECOGNIZED.contains(k))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Ok(Self {
            host,
            port,
            tls,
            credentials,
            debug,
            extensions,
        })
    }
}
