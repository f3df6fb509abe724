//! Authentication strategies.
//!
//! # Design
//! A strategy gets two chances to act on a request: `apply_params` runs on the
//! raw parameter map before any encoding decision, `apply_headers` runs on the
//! assembled message. Strategies hold no state of their own; credentials are
//! passed in on every call.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::config::Credentials;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::params::{to_pairs, Params};

/// Injects credentials into an outgoing request.
pub trait AuthenticationStrategy: Send + Sync + fmt::Debug {
    /// Param stage. Runs before params are placed in the query or body.
    fn apply_params(&self, _credentials: &Credentials, _params: &mut Params) -> Result<(), ApiError> {
        Ok(())
    }

    /// Message stage. Runs once the request is assembled.
    fn apply_headers(&self, _credentials: &Credentials, _request: &mut HttpRequest) -> Result<(), ApiError> {
        Ok(())
    }
}

/// `api_key` and `api_secret` as request parameters. The default strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeySecretParams;

impl AuthenticationStrategy for KeySecretParams {
    fn apply_params(&self, credentials: &Credentials, params: &mut Params) -> Result<(), ApiError> {
        let key = require(&credentials.api_key, "api_key")?;
        let secret = require(&credentials.api_secret, "api_secret")?;
        params.insert("api_key".to_string(), Value::from(key));
        params.insert("api_secret".to_string(), Value::from(secret));
        Ok(())
    }
}

/// `Authorization: Bearer <token>` header. Params are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerToken;

impl AuthenticationStrategy for BearerToken {
    fn apply_headers(&self, credentials: &Credentials, request: &mut HttpRequest) -> Result<(), ApiError> {
        let token = require(&credentials.token, "token")?;
        request.set_header("Authorization", format!("Bearer {token}"));
        Ok(())
    }
}

/// `api_key`, `timestamp` and a `sig` digest over the sorted params.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignedParams;

impl AuthenticationStrategy for SignedParams {
    fn apply_params(&self, credentials: &Credentials, params: &mut Params) -> Result<(), ApiError> {
        let key = require(&credentials.api_key, "api_key")?;
        let secret = require(&credentials.signature_secret, "signature_secret")?;

        params.insert("api_key".to_string(), Value::from(key));
        params.entry("timestamp".to_string()).or_insert_with(|| {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            Value::from(now)
        });
        params.remove("sig");

        let sig = signature(params, secret);
        params.insert("sig".to_string(), Value::from(sig));
        Ok(())
    }
}

/// Hex SHA-256 of `&k=v&k=v...` (sorted by key) followed by `secret`.
///
/// `&` and `=` inside values are replaced with `_` before hashing.
pub fn signature(params: &Params, secret: &str) -> String {
    let mut input = String::new();
    // BTreeMap iteration is already key-sorted.
    for (key, value) in to_pairs(params) {
        if key == "sig" {
            continue;
        }
        input.push('&');
        input.push_str(&key);
        input.push('=');
        input.push_str(&value.replace(['&', '='], "_"));
    }
    input.push_str(secret);
    hex::encode(Sha256::digest(input.as_bytes()))
}

fn require<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, ApiError> {
    value.as_deref().ok_or(ApiError::MissingCredential(field))
}
