//! Body encoders for methods that carry parameters in the request body.
//!
//! # Design
//! Each namespace picks one encoder at construction. The encoder only sees the
//! final, already-authenticated parameter map and returns the bytes plus the
//! matching `Content-Type`.

use std::fmt;

use crate::error::ApiError;
use crate::params::{encode_query, Params};

/// Encoded request body together with its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Strategy that turns a parameter map into a request body.
pub trait ParamsEncoder: Send + Sync + fmt::Debug {
    fn encode(&self, params: &Params) -> Result<EncodedBody, ApiError>;
}

/// `application/x-www-form-urlencoded` bodies. The default encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormEncoder;

impl ParamsEncoder for FormEncoder {
    fn encode(&self, params: &Params) -> Result<EncodedBody, ApiError> {
        Ok(EncodedBody {
            content_type: "application/x-www-form-urlencoded",
            body: encode_query(params).into_bytes(),
        })
    }
}

/// `application/json` bodies. Arrays and nested objects keep their JSON shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl ParamsEncoder for JsonEncoder {
    fn encode(&self, params: &Params) -> Result<EncodedBody, ApiError> {
        let body = serde_json::to_vec(params).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(EncodedBody {
            content_type: "application/json",
            body,
        })
    }
}
