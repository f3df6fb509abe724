//! Client credentials and configuration.
//!
//! # Design
//! Configuration is an explicit value handed to `Client::new`; nothing is read
//! from process-wide state after construction. `from_env` is a convenience
//! for binaries and scripts.

use std::fmt;

use crate::transport::TransportConfig;

/// Default API host used by namespaces that do not override it.
pub const DEFAULT_API_HOST: &str = "api.nexmo.com";

/// Credential material consumed by authentication strategies.
///
/// Each strategy reads only the fields it needs; the rest may stay `None`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub signature_secret: Option<String>,
    pub token: Option<String>,
}

impl Credentials {
    pub fn key_secret(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            api_secret: Some(api_secret.into()),
            ..Self::default()
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn with_signature_secret(mut self, secret: impl Into<String>) -> Self {
        self.signature_secret = Some(secret.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &Option<String>) -> Option<&'static str> {
            value.as_ref().map(|_| "[REDACTED]")
        }

        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &redact(&self.api_secret))
            .field("signature_secret", &redact(&self.signature_secret))
            .field("token", &redact(&self.token))
            .finish()
    }
}

/// Configuration for a `Client`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host used by namespaces that do not set their own.
    pub api_host: String,
    /// Optional application identifier appended to the User-Agent.
    pub app_name: Option<String>,
    pub app_version: Option<String>,
    pub credentials: Credentials,
    pub transport: TransportConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            app_name: None,
            app_version: None,
            credentials: Credentials::default(),
            transport: TransportConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `NEXMO_API_KEY`, `NEXMO_API_SECRET`, `NEXMO_SIGNATURE_SECRET`,
    /// `NEXMO_TOKEN` and `NEXMO_API_HOST` (default: `api.nexmo.com`). Unset
    /// variables leave the corresponding field empty.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            api_host: var("NEXMO_API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.to_string()),
            credentials: Credentials {
                api_key: var("NEXMO_API_KEY"),
                api_secret: var("NEXMO_API_SECRET"),
                signature_secret: var("NEXMO_SIGNATURE_SECRET"),
                token: var("NEXMO_TOKEN"),
            },
            ..Self::default()
        }
    }

    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    pub fn with_app(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self.app_version = Some(version.into());
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    /// User-Agent sent with every request.
    pub fn user_agent(&self) -> String {
        let mut ua = format!("nexmo-rust/{}", env!("CARGO_PKG_VERSION"));
        if let (Some(name), Some(version)) = (&self.app_name, &self.app_version) {
            ua.push_str(&format!(" {name}/{version}"));
        }
        ua
    }
}
