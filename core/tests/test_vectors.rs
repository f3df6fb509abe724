//! Verify request assembly and response classification against the JSON test
//! vectors stored in `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use std::io::{Cursor, Read};
use std::sync::Arc;

use nexmo_core::{
    classify, ApiError, BearerToken, Body, ChunkCallback, Client, ClientConfig, Credentials, FormEncoder, HttpMethod,
    HttpRequest, HttpResponse, JsonEncoder, KeySecretParams, NamespaceConfig, Outcome, Params, Transport,
};

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_headers(value: &serde_json::Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

/// Body split into two reads so streaming sees more than one chunk.
fn split_reader(body: &str) -> impl Read {
    let bytes = body.as_bytes().to_vec();
    let mid = bytes.len() / 2;
    Cursor::new(bytes[..mid].to_vec()).chain(Cursor::new(bytes[mid..].to_vec()))
}

/// Transport that must never be reached; request vectors only build.
struct Unreachable;

impl Transport for Unreachable {
    fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        panic!("request vectors must not send");
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[test]
fn classify_test_vectors() {
    let raw = include_str!("../../test-vectors/classify.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["response"];
        let body = sim["body"].as_str().unwrap();
        let response = HttpResponse::from_reader(
            sim["status"].as_u64().unwrap() as u16,
            parse_headers(&sim["headers"]),
            split_reader(body),
        );

        let mut streamed = Vec::new();
        let mut cb = |chunk: &[u8]| -> std::io::Result<()> {
            streamed.extend_from_slice(chunk);
            Ok(())
        };
        let callback: Option<ChunkCallback<'_>> = if case["stream"].as_bool().unwrap_or(false) {
            Some(&mut cb)
        } else {
            None
        };
        let result = classify("api.nexmo.com", response, callback);

        let expected = &case["expected"];
        if let Some(kind) = expected["error"].as_str() {
            let err = result.unwrap_err();
            let matched = match kind {
                "Authentication" => matches!(err, ApiError::Authentication { .. }),
                "Client" => matches!(err, ApiError::Client { .. }),
                "Server" => matches!(err, ApiError::Server { .. }),
                "Generic" => matches!(err, ApiError::Generic { .. }),
                other => panic!("{name}: unknown expected error: {other}"),
            };
            assert!(matched, "{name}: expected {kind}, got {err:?}");
            assert_eq!(
                err.body(),
                Some(expected["body"].as_str().unwrap().as_bytes()),
                "{name}: error body"
            );
            assert!(streamed.is_empty(), "{name}: errors must not stream");
            continue;
        }

        let outcome = result.unwrap();
        match expected["outcome"].as_str().unwrap() {
            "no_content" => assert_eq!(outcome, Outcome::NoContent, "{name}"),
            "json" => assert_eq!(
                outcome,
                Outcome::Success(Body::Json(expected["json"].clone())),
                "{name}"
            ),
            "raw" => assert_eq!(
                outcome,
                Outcome::Success(Body::Raw(expected["raw"].as_str().unwrap().as_bytes().to_vec())),
                "{name}"
            ),
            "stream" => {
                assert_eq!(outcome, Outcome::SuccessStream, "{name}");
                assert_eq!(streamed, expected["raw"].as_str().unwrap().as_bytes(), "{name}: streamed bytes");
            }
            other => panic!("{name}: unknown expected outcome: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Request assembly
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let client = Client::with_transport(
        ClientConfig::new(Credentials::key_secret("K", "S").with_token("T")),
        Arc::new(Unreachable),
    );

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let ns_vector = &case["namespace"];
        let mut config = NamespaceConfig::default();
        config = match ns_vector["auth"].as_str().unwrap() {
            "key_secret" => config.with_authentication(KeySecretParams),
            "bearer" => config.with_authentication(BearerToken),
            other => panic!("{name}: unknown auth: {other}"),
        };
        config = match ns_vector["encoder"].as_str().unwrap() {
            "form" => config.with_encoder(FormEncoder),
            "json" => config.with_encoder(JsonEncoder),
            other => panic!("{name}: unknown encoder: {other}"),
        };
        let ns = client.namespace(config);

        let input = &case["input"];
        let params: Option<Params> = serde_json::from_value(input["params"].clone()).unwrap();
        let req = ns
            .build_request(
                input["path"].as_str().unwrap(),
                params,
                parse_method(input["method"].as_str().unwrap()),
            )
            .unwrap();

        let expected = &case["expected_request"];
        assert_eq!(req.host, "api.nexmo.com", "{name}: host");
        assert_eq!(req.path, input["path"].as_str().unwrap(), "{name}: path");
        assert_eq!(req.query.as_deref(), expected["query"].as_str(), "{name}: query");
        assert_eq!(
            req.header("content-type"),
            expected["content_type"].as_str(),
            "{name}: content type"
        );
        assert_eq!(
            req.header("authorization"),
            expected["authorization"].as_str(),
            "{name}: authorization"
        );
        assert!(req.header("user-agent").is_some(), "{name}: user agent");

        if let Some(json_body) = expected.get("json_body") {
            let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&body, json_body, "{name}: json body");
        } else {
            assert_eq!(
                req.body.as_deref(),
                expected["body"].as_str().map(str::as_bytes),
                "{name}: body"
            );
        }
    }
}
