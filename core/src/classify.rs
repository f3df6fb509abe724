//! Response classification.
//!
//! # Design
//! Every response goes through `classify` exactly once and yields exactly one
//! of `Success`, `SuccessStream`, `NoContent` or an `ApiError`. The status is
//! first mapped to a `StatusClass` and the match over that enum is the only
//! place status codes are interpreted. JSON detection runs before the stream
//! callback is considered, so a JSON body is always parsed even when the
//! caller asked to stream.

use std::io::{self, Read};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Callback receiving body chunks in arrival order.
pub type ChunkCallback<'a> = &'a mut dyn FnMut(&[u8]) -> io::Result<()>;

const CHUNK_SIZE: usize = 8 * 1024;

/// Status code bucket used to pick an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    NoContent,
    Success,
    Unauthorized,
    ClientError,
    ServerError,
    Other,
}

impl StatusClass {
    pub fn from_status(status: u16) -> Self {
        match status {
            204 => StatusClass::NoContent,
            200..=299 => StatusClass::Success,
            401 => StatusClass::Unauthorized,
            400..=499 => StatusClass::ClientError,
            500..=599 => StatusClass::ServerError,
            _ => StatusClass::Other,
        }
    }
}

/// Parsed body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Raw(Vec<u8>),
}

impl Body {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            Body::Raw(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Body::Raw(bytes) => Some(bytes),
            Body::Json(_) => None,
        }
    }

    /// Deserialize a JSON body into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        match self {
            Body::Json(value) => {
                T::deserialize(value).map_err(|e| ApiError::Deserialization(e.to_string()))
            }
            Body::Raw(bytes) => {
                serde_json::from_slice(bytes).map_err(|e| ApiError::Deserialization(e.to_string()))
            }
        }
    }
}

/// Result of a successful request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Body),
    /// The body was handed to the caller's chunk callback.
    SuccessStream,
    NoContent,
}

impl Outcome {
    pub fn body(&self) -> Option<&Body> {
        match self {
            Outcome::Success(body) => Some(body),
            _ => None,
        }
    }
}

/// Turn `response` into an `Outcome` or the matching `ApiError`.
///
/// `host` is only used for the completion log record.
pub fn classify(
    host: &str,
    mut response: HttpResponse,
    callback: Option<ChunkCallback<'_>>,
) -> Result<Outcome, ApiError> {
    tracing::info!(
        host,
        status = response.status,
        content_type = response.content_type(),
        content_length = response.content_length(),
        trace_id = response.trace_id(),
        "Nexmo API response"
    );

    let status = response.status;
    match StatusClass::from_status(status) {
        StatusClass::NoContent => Ok(Outcome::NoContent),
        StatusClass::Success => {
            let is_json = response
                .content_type()
                .is_some_and(|ct| ct.eq_ignore_ascii_case("application/json"));
            if is_json {
                let body = response.read_body()?;
                let value = serde_json::from_slice(&body)
                    .map_err(|e| ApiError::Deserialization(e.to_string()))?;
                Ok(Outcome::Success(Body::Json(value)))
            } else if let Some(callback) = callback {
                stream_chunks(&mut response.body, callback)?;
                Ok(Outcome::SuccessStream)
            } else {
                Ok(Outcome::Success(Body::Raw(response.read_body()?)))
            }
        }
        class => {
            let body = response.read_body()?;
            tracing::debug!(status, body = %String::from_utf8_lossy(&body), "Nexmo API error body");
            Err(match class {
                StatusClass::Unauthorized => ApiError::Authentication { status, body },
                StatusClass::ClientError => ApiError::Client { status, body },
                StatusClass::ServerError => ApiError::Server { status, body },
                _ => ApiError::Generic { status, body },
            })
        }
    }
}

/// Feed `reader` to `callback` one read at a time until EOF.
fn stream_chunks(reader: &mut dyn Read, callback: ChunkCallback<'_>) -> io::Result<()> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        callback(&buf[..n])?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    fn response(status: u16, content_type: Option<&str>, body: &str) -> HttpResponse {
        let headers = content_type
            .map(|ct| vec![("content-type".to_string(), ct.to_string())])
            .unwrap_or_default();
        HttpResponse::new(status, headers, body)
    }

    #[test]
    fn status_classes() {
        assert_eq!(StatusClass::from_status(204), StatusClass::NoContent);
        assert_eq!(StatusClass::from_status(200), StatusClass::Success);
        assert_eq!(StatusClass::from_status(201), StatusClass::Success);
        assert_eq!(StatusClass::from_status(401), StatusClass::Unauthorized);
        assert_eq!(StatusClass::from_status(404), StatusClass::ClientError);
        assert_eq!(StatusClass::from_status(500), StatusClass::ServerError);
        assert_eq!(StatusClass::from_status(399), StatusClass::Other);
        assert_eq!(StatusClass::from_status(100), StatusClass::Other);
    }

    #[test]
    fn no_content_ignores_body() {
        let outcome = classify("h", response(204, Some("application/json"), "garbage"), None).unwrap();
        assert_eq!(outcome, Outcome::NoContent);
    }

    #[test]
    fn json_with_charset_is_parsed() {
        let outcome = classify(
            "h",
            response(200, Some("application/json; charset=utf-8"), r#"{"id":"abc","count":2}"#),
            None,
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Success(Body::Json(json!({"id": "abc", "count": 2}))));
    }

    #[test]
    fn json_media_type_is_case_insensitive() {
        let outcome = classify("h", response(200, Some("Application/JSON; charset=UTF-8"), r#"{"a":1}"#), None).unwrap();
        assert_eq!(outcome, Outcome::Success(Body::Json(json!({"a": 1}))));
    }

    #[test]
    fn malformed_json_is_a_deserialization_error() {
        let err = classify("h", response(200, Some("application/json"), "nope"), None).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn non_json_without_callback_returns_raw_bytes() {
        let outcome = classify("h", response(200, Some("audio/mpeg"), "ID3"), None).unwrap();
        assert_eq!(outcome, Outcome::Success(Body::Raw(b"ID3".to_vec())));
    }

    #[test]
    fn missing_content_type_is_raw() {
        let outcome = classify("h", response(200, None, "x"), None).unwrap();
        assert_eq!(outcome.body().and_then(Body::as_bytes), Some(&b"x"[..]));
    }

    #[test]
    fn callback_receives_chunks_in_order() {
        let reader = Cursor::new(b"hel".to_vec()).chain(Cursor::new(b"lo".to_vec()));
        let resp = HttpResponse::from_reader(
            200,
            vec![("Content-Type".to_string(), "application/octet-stream".to_string())],
            reader,
        );

        let mut chunks: Vec<Vec<u8>> = Vec::new();
        let mut cb = |chunk: &[u8]| -> io::Result<()> {
            chunks.push(chunk.to_vec());
            Ok(())
        };
        let outcome = classify("h", resp, Some(&mut cb)).unwrap();

        assert_eq!(outcome, Outcome::SuccessStream);
        assert_eq!(chunks, vec![b"hel".to_vec(), b"lo".to_vec()]);
    }

    #[test]
    fn json_takes_precedence_over_callback() {
        let mut called = false;
        let mut cb = |_: &[u8]| -> io::Result<()> {
            called = true;
            Ok(())
        };
        let outcome = classify("h", response(200, Some("application/json"), "[1]"), Some(&mut cb)).unwrap();
        assert_eq!(outcome, Outcome::Success(Body::Json(json!([1]))));
        assert!(!called);
    }

    #[test]
    fn callback_error_propagates() {
        let mut cb = |_: &[u8]| -> io::Result<()> { Err(io::Error::other("disk full")) };
        let err = classify("h", response(200, Some("text/plain"), "x"), Some(&mut cb)).unwrap_err();
        assert!(matches!(err, ApiError::Io(_)));
    }

    #[test]
    fn error_statuses_map_to_kinds_with_body() {
        let err = classify("h", response(401, None, "denied"), None).unwrap_err();
        assert!(matches!(err, ApiError::Authentication { status: 401, .. }));
        assert_eq!(err.body(), Some(&b"denied"[..]));

        let err = classify("h", response(404, None, ""), None).unwrap_err();
        assert!(matches!(err, ApiError::Client { status: 404, .. }));

        let err = classify("h", response(503, None, ""), None).unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 503, .. }));

        let err = classify("h", response(399, None, ""), None).unwrap_err();
        assert!(matches!(err, ApiError::Generic { status: 399, .. }));
    }

    #[test]
    fn errors_never_invoke_callback() {
        let mut called = false;
        let mut cb = |_: &[u8]| -> io::Result<()> {
            called = true;
            Ok(())
        };
        let err = classify("h", response(500, Some("text/plain"), "boom"), Some(&mut cb)).unwrap_err();
        assert!(matches!(err, ApiError::Server { .. }));
        assert!(!called);
    }

    #[test]
    fn body_deserialize_into_struct() {
        #[derive(serde::Deserialize)]
        struct Balance {
            value: f64,
        }
        let body = Body::Json(json!({"value": 10.5}));
        let balance: Balance = body.deserialize().unwrap();
        assert_eq!(balance.value, 10.5);
    }
}
