//! The HTTP boundary.
//!
//! # Design
//! The dispatcher only knows the `Transport` trait: send an `HttpRequest`,
//! get an `HttpResponse` back. Status codes are data at this layer; a 404 is a
//! successful round-trip. `UreqTransport` is the default implementation and
//! hands the body back as a reader so downloads are never buffered here.

use std::time::Duration;

use ureq::tls::TlsConfig;
use ureq::{Agent, RequestBuilder};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Something that can execute an `HttpRequest`.
pub trait Transport: Send + Sync {
    /// Execute `request`. Non-2xx statuses must come back as `Ok`.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Knobs for `UreqTransport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// `https` in production; `http` is accepted for local test servers.
    pub scheme: String,
    /// Establishing the TCP connection and TLS session.
    pub connect_timeout: Option<Duration>,
    /// From the end of the request until the response status line and
    /// headers have arrived. Does not cover the body.
    pub read_timeout: Option<Duration>,
    /// Deadline for the entire response body. `None` lets a download run as
    /// long as the server keeps it open.
    pub body_timeout: Option<Duration>,
    pub verify_tls: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            connect_timeout: Some(Duration::from_secs(10)),
            read_timeout: Some(Duration::from_secs(30)),
            body_timeout: None,
            verify_tls: true,
        }
    }
}

impl TransportConfig {
    /// Plain-HTTP configuration for talking to a local server.
    pub fn plain_http() -> Self {
        Self {
            scheme: "http".to_string(),
            ..Self::default()
        }
    }
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
    scheme: String,
}

impl UreqTransport {
    pub fn new(config: &TransportConfig) -> Self {
        // Status interpretation belongs to the classifier: ureq must neither
        // turn 4xx/5xx into errors nor chase 3xx responses.
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .timeout_connect(config.connect_timeout)
            .timeout_recv_response(config.read_timeout)
            .timeout_recv_body(config.body_timeout)
            .tls_config(
                TlsConfig::builder()
                    .disable_verification(!config.verify_tls)
                    .build(),
            )
            .build()
            .new_agent();

        Self {
            agent,
            scheme: config.scheme.clone(),
        }
    }

    fn url(&self, request: &HttpRequest) -> String {
        format!("{}://{}{}", self.scheme, request.host, request.path_and_query())
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = self.url(request);
        let body = request.body.as_deref();

        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(&url), &request.headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&url), &request.headers).call(),
            HttpMethod::Post => send_body(with_headers(self.agent.post(&url), &request.headers), body),
            HttpMethod::Put => send_body(with_headers(self.agent.put(&url), &request.headers), body),
        };
        let response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        Ok(HttpResponse::from_reader(
            status,
            headers,
            response.into_body().into_reader(),
        ))
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_body(
    builder: RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&[u8]>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(bytes),
        None => builder.send_empty(),
    }
}
