//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) and open a span carrying it
//! - Parse JSON bodies leniently: a missing or malformed body is an empty
//!   object, and fields are coerced the way loose JSON clients expect

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::{HeaderValue, Request as HttpRequest},
};
use serde_json::{Map, Value};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

use crate::capacity::integer_from_value;
use crate::http::response::ApiError;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Stamps each incoming request with a fresh UUID v4.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdGenerator;

impl MakeRequestId for RequestIdGenerator {
    fn make_request_id<B>(&mut self, _request: &HttpRequest<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Span for one API call, tagged with its request ID.
pub fn request_span(request: &HttpRequest<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "api_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

/// A JSON object body with forgiving field accessors.
#[derive(Debug, Clone, Default)]
pub struct JsonBody(Map<String, Value>);

impl JsonBody {
    pub fn parse(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Self(map),
            _ => Self::default(),
        }
    }

    fn present(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// String field, trimmed; empty when missing or not a string.
    pub fn string(&self, key: &str) -> String {
        self.present(key)
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    pub fn integer(&self, key: &str) -> Result<Option<i64>, ApiError> {
        self.present(key)
            .map(|v| {
                integer_from_value(v)
                    .ok_or_else(|| ApiError::InvalidInput(format!("{} must be an integer", key)))
            })
            .transpose()
    }

    pub fn float(&self, key: &str) -> Result<Option<f64>, ApiError> {
        self.present(key)
            .map(|v| {
                let parsed = match v {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                };
                parsed.ok_or_else(|| ApiError::InvalidInput(format!("{} must be a number", key)))
            })
            .transpose()
    }

    pub fn array(&self, key: &str) -> Result<Option<Vec<Value>>, ApiError> {
        self.present(key)
            .map(|v| match v {
                Value::Array(items) => Ok(items.clone()),
                _ => Err(ApiError::InvalidInput(format!("{} must be a list", key))),
            })
            .transpose()
    }
}

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = BytesRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        Ok(Self::parse(&bytes))
    }
}
