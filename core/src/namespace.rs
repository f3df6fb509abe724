//! Request dispatcher shared by every API namespace.
//!
//! # Design
//! A `Namespace` pairs an immutable `NamespaceConfig` (host, authentication
//! strategy, body encoder) with the shared client context (credentials,
//! user agent, transport). A call is split into `build_request`, which is
//! pure and testable, and the send/classify step. The namespace holds no
//! mutable state, so one instance can serve any number of requests, including
//! from several threads at once.

use std::fmt;
use std::sync::Arc;

use crate::auth::{AuthenticationStrategy, KeySecretParams};
use crate::classify::{classify, ChunkCallback, Outcome};
use crate::client::ClientContext;
use crate::encoder::{FormEncoder, ParamsEncoder};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::params::{encode_query, Params};

/// Per-namespace dispatch settings, fixed at construction.
///
/// Defaults: the client's API host, `KeySecretParams`, `FormEncoder`.
#[derive(Clone)]
pub struct NamespaceConfig {
    /// `None` falls back to `ClientConfig::api_host`.
    pub host: Option<String>,
    pub authentication: Arc<dyn AuthenticationStrategy>,
    pub encoder: Arc<dyn ParamsEncoder>,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            host: None,
            authentication: Arc::new(KeySecretParams),
            encoder: Arc::new(FormEncoder),
        }
    }
}

impl NamespaceConfig {
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_authentication(mut self, strategy: impl AuthenticationStrategy + 'static) -> Self {
        self.authentication = Arc::new(strategy);
        self
    }

    pub fn with_encoder(mut self, encoder: impl ParamsEncoder + 'static) -> Self {
        self.encoder = Arc::new(encoder);
        self
    }
}

impl fmt::Debug for NamespaceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceConfig")
            .field("host", &self.host)
            .field("authentication", &self.authentication)
            .field("encoder", &self.encoder)
            .finish()
    }
}

/// A group of API operations sharing one host, auth strategy and encoder.
#[derive(Clone)]
pub struct Namespace {
    host: String,
    config: NamespaceConfig,
    context: Arc<ClientContext>,
}

impl Namespace {
    pub(crate) fn new(context: Arc<ClientContext>, config: NamespaceConfig) -> Self {
        let host = config
            .host
            .clone()
            .unwrap_or_else(|| context.api_host.clone());
        Self {
            host,
            config,
            context,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    /// Assemble the outgoing request without sending it.
    ///
    /// Authentication touches the params first, so credentials injected as
    /// params count when deciding whether a query string is attached.
    pub fn build_request(
        &self,
        path: &str,
        params: Option<Params>,
        method: HttpMethod,
    ) -> Result<HttpRequest, ApiError> {
        let credentials = &self.context.credentials;
        let mut params = params.unwrap_or_default();

        self.config
            .authentication
            .apply_params(credentials, &mut params)?;

        let query = if !method.has_body() && !params.is_empty() {
            Some(encode_query(&params))
        } else {
            None
        };

        let mut request = HttpRequest {
            method,
            host: self.host.clone(),
            path: path.to_string(),
            query,
            headers: Vec::new(),
            body: None,
        };

        if method.has_body() {
            let encoded = self.config.encoder.encode(&params)?;
            request.set_header("Content-Type", encoded.content_type);
            request.body = Some(encoded.body);
        }

        self.config
            .authentication
            .apply_headers(credentials, &mut request)?;
        request.set_header("User-Agent", self.context.user_agent.as_str());

        Ok(request)
    }

    /// Send a request and classify the response.
    pub fn request(
        &self,
        path: &str,
        params: Option<Params>,
        method: HttpMethod,
    ) -> Result<Outcome, ApiError> {
        self.dispatch(path, params, method, None)
    }

    /// Like `request`, but a non-JSON success body is fed to `callback` chunk
    /// by chunk instead of being buffered.
    pub fn request_streaming(
        &self,
        path: &str,
        params: Option<Params>,
        method: HttpMethod,
        callback: ChunkCallback<'_>,
    ) -> Result<Outcome, ApiError> {
        self.dispatch(path, params, method, Some(callback))
    }

    fn dispatch(
        &self,
        path: &str,
        params: Option<Params>,
        method: HttpMethod,
        callback: Option<ChunkCallback<'_>>,
    ) -> Result<Outcome, ApiError> {
        let request = self.build_request(path, params, method)?;

        // Path only: the query string may hold credentials.
        tracing::info!(method = %request.method, path = %request.path, "Nexmo API request");

        let response = self.context.transport.send(&request)?;
        classify(&self.host, response, callback)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("host", &self.host)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
