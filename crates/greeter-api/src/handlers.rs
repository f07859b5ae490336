//! Greeter handlers.
//!
//! Handlers are plain functions from request data to an [`ApiResponse`]; they
//! know nothing about axum extractors or the hosting platform. The router
//! module adapts them to axum.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::models::{MessageResponse, NameRequest};

/// Message returned by `GET /hello-world`.
pub const HELLO_WORLD_MESSAGE: &str = "Hello World!";

/// Message returned when the `/your-name` body cannot be decoded.
pub const INVALID_BODY_MESSAGE: &str = "invalid request body provided";

/// Message returned when the `/your-name` body decodes but carries no name.
pub const MISSING_NAME_MESSAGE: &str = "if you don't tell me I don't know your name";

/// A status code paired with the JSON message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: MessageResponse,
}

impl ApiResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: MessageResponse::new(message),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Result of evaluating a `/your-name` body.
///
/// Attached to the HTTP response as an extension so middleware can count
/// outcomes without re-parsing the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GreetOutcome {
    Greeted(String),
    InvalidBody,
    MissingName,
}

impl GreetOutcome {
    /// Decode a raw request body into an outcome.
    ///
    /// Only the first JSON value in the body is read; anything after it is
    /// ignored. The value must be an object (or `null`, which counts as an
    /// empty request). Without an exact `name` key, the first key equal to
    /// `name` ignoring ASCII case is used instead.
    pub fn evaluate(body: &[u8]) -> Self {
        let first = serde_json::Deserializer::from_slice(body)
            .into_iter::<Value>()
            .next();

        let request = match first {
            Some(Ok(Value::Null)) => NameRequest::default(),
            Some(Ok(Value::Object(mut fields))) => {
                canonicalize_name_key(&mut fields);
                match serde_json::from_value(Value::Object(fields)) {
                    Ok(request) => request,
                    Err(e) => {
                        debug!(error = %e, "request body has the wrong shape");
                        return Self::InvalidBody;
                    }
                }
            }
            Some(Ok(_)) => return Self::InvalidBody,
            Some(Err(e)) => {
                debug!(error = %e, "request body is not valid JSON");
                return Self::InvalidBody;
            }
            None => return Self::InvalidBody,
        };

        if request.has_name() {
            Self::Greeted(request.name)
        } else {
            Self::MissingName
        }
    }

    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Greeted(_) => "greeted",
            Self::InvalidBody => "invalid_body",
            Self::MissingName => "missing_name",
        }
    }
}

fn canonicalize_name_key(fields: &mut Map<String, Value>) {
    if fields.contains_key("name") {
        return;
    }
    let key = fields
        .keys()
        .find(|key| key.eq_ignore_ascii_case("name"))
        .cloned();
    if let Some(value) = key.and_then(|key| fields.remove(&key)) {
        fields.insert("name".to_string(), value);
    }
}

impl From<&GreetOutcome> for ApiResponse {
    fn from(outcome: &GreetOutcome) -> Self {
        match outcome {
            GreetOutcome::Greeted(name) => ApiResponse::ok(format!("your name is: {}", name)),
            GreetOutcome::InvalidBody => ApiResponse::bad_request(INVALID_BODY_MESSAGE),
            GreetOutcome::MissingName => ApiResponse::bad_request(MISSING_NAME_MESSAGE),
        }
    }
}

/// `GET /hello-world`.
pub fn hello_world() -> ApiResponse {
    info!("{}", HELLO_WORLD_MESSAGE);
    ApiResponse::ok(HELLO_WORLD_MESSAGE)
}

/// `POST /your-name`.
pub fn greet(body: &[u8]) -> ApiResponse {
    ApiResponse::from(&GreetOutcome::evaluate(body))
}
