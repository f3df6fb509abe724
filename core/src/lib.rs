//! Blocking client core for the Nexmo REST API.
//!
//! # Overview
//! Every API call goes through one dispatcher (`Namespace`): authenticate the
//! params, place them in the query string or body, attach headers, send via a
//! `Transport`, and classify the response into an `Outcome` or `ApiError`.
//!
//! # Design
//! - Authentication and body encoding are strategy objects chosen per
//!   namespace (`NamespaceConfig`), never global state.
//! - `Namespace::build_request` is pure, so request assembly is testable
//!   without a network; `classify` is the only code that interprets status
//!   codes.
//! - The transport is a trait. `UreqTransport` is the default and returns the
//!   body as a reader so downloads can stream straight to disk.
//! - Each request blocks the calling thread. Timeouts and TLS verification
//!   live in `TransportConfig`.

pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod encoder;
pub mod error;
pub mod files;
pub mod http;
pub mod namespace;
pub mod params;
pub mod transport;

pub use auth::{AuthenticationStrategy, BearerToken, KeySecretParams, SignedParams};
pub use classify::{classify, Body, ChunkCallback, Outcome, StatusClass};
pub use client::Client;
pub use config::{ClientConfig, Credentials, DEFAULT_API_HOST};
pub use encoder::{EncodedBody, FormEncoder, JsonEncoder, ParamsEncoder};
pub use error::ApiError;
pub use files::Files;
pub use http::{HttpMethod, HttpRequest, HttpResponse, TRACE_ID_HEADER};
pub use namespace::{Namespace, NamespaceConfig};
pub use params::{encode_query, params, Params};
pub use transport::{Transport, TransportConfig, UreqTransport};
