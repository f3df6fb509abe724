use std::{collections::HashMap, convert::Infallible, sync::Arc, time::Duration};

use axum::{
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::mpsc};
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

pub const API_KEY: &str = "K";
pub const API_SECRET: &str = "S";
pub const BEARER_TOKEN: &str = "T";
pub const TRACE_ID_HEADER: &str = "x-nexmo-trace-id";

/// File served at `/v1/files/{FILE_ID}`.
pub const FILE_ID: &str = "aaaaaaaa-bbbb-cccc-dddd-0123456789ab";
pub const FILE_CONTENTS: &[u8] = b"hello";

/// Served by `/slow` one byte per `SLOW_INTERVAL`.
pub const SLOW_BODY: &[u8] = b"abcdef";
pub const SLOW_INTERVAL: Duration = Duration::from_millis(400);

/// What `/echo` saw, returned as JSON so clients can assert on it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Echo {
    pub method: String,
    pub query: HashMap<String, String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
    pub body: Value,
}

#[derive(Deserialize)]
pub struct KeySecret {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

pub struct AppState {
    pub files: HashMap<String, Vec<u8>>,
}

pub type Db = Arc<AppState>;

pub fn app() -> Router {
    let db: Db = Arc::new(AppState {
        files: HashMap::from([(FILE_ID.to_string(), FILE_CONTENTS.to_vec())]),
    });
    Router::new()
        .route("/echo", any(echo))
        .route("/account/get-balance", get(get_balance))
        .route("/v1/files/{id}", get(get_file).delete(delete_file))
        .route("/status/{code}", any(status))
        .route("/slow", get(slow))
        .layer(middleware::map_response(add_trace_id))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn add_trace_id(mut response: Response) -> Response {
    if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }
    response
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    header_string(headers, header::AUTHORIZATION) == Some(format!("Bearer {BEARER_TOKEN}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"type": "UNAUTHORIZED", "title": "Invalid credentials"})),
    )
        .into_response()
}

async fn echo(
    method: Method,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Json<Echo> {
    let content_type = header_string(&headers, header::CONTENT_TYPE);
    let body = match content_type.as_deref() {
        Some(ct) if ct.starts_with("application/json") => {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        }
        Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
            let pairs: HashMap<String, String> = serde_urlencoded::from_bytes(&body).unwrap_or_default();
            json!(pairs)
        }
        _ => Value::Null,
    };

    Json(Echo {
        method: method.to_string(),
        query,
        content_type,
        authorization: header_string(&headers, header::AUTHORIZATION),
        user_agent: header_string(&headers, header::USER_AGENT),
        body,
    })
}

async fn get_balance(Query(creds): Query<KeySecret>) -> Response {
    if creds.api_key.as_deref() != Some(API_KEY) || creds.api_secret.as_deref() != Some(API_SECRET) {
        return unauthorized();
    }
    Json(json!({"value": 10.28, "autoReload": false})).into_response()
}

async fn get_file(State(db): State<Db>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    if !bearer_ok(&headers) {
        return unauthorized();
    }
    match db.files.get(&id) {
        Some(contents) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            Body::from(contents.clone()),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"title": "Not Found"}))).into_response(),
    }
}

async fn delete_file(State(db): State<Db>, Path(id): Path<String>, headers: HeaderMap) -> StatusCode {
    if !bearer_ok(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    if db.files.contains_key(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Reply with whatever status the path names. Out-of-range codes become 400.
async fn status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, format!("status {code}")).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

/// Drip `SLOW_BODY` out with a pause between bytes.
async fn slow() -> Response {
    let (tx, rx) = mpsc::channel::<Result<Bytes, Infallible>>(1);
    tokio::spawn(async move {
        for (i, byte) in SLOW_BODY.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(SLOW_INTERVAL).await;
            }
            if tx.send(Ok(Bytes::copy_from_slice(&[*byte]))).await.is_err() {
                return;
            }
        }
    });
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        Body::from_stream(ReceiverStream::new(rx)),
    )
        .into_response()
}
