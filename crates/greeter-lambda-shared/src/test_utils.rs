//! Test utilities for Lambda handler testing.
//!
//! Builders for API Gateway proxy events and helpers for reading proxy
//! responses, shared by the adapter's own tests and the Lambda crate.
//!
//! ```ignore
//! use greeter_lambda_shared::test_utils::{lambda_event, ProxyEventBuilder};
//!
//! let event = ProxyEventBuilder::post("/your-name")
//!     .json_body(r#"{"name":"Wim"}"#)
//!     .request_id(mock_request_id("happy"))
//!     .build();
//! let invocation = lambda_event(&event);
//! ```

use std::collections::BTreeMap;

use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use lambda_runtime::{Context, LambdaEvent};
use serde_json::{json, Value};

/// Fluent builder for proxy events.
///
/// Produces the JSON API Gateway would deliver, so events built here go
/// through the same deserialization as real invocations.
#[derive(Debug, Clone)]
pub struct ProxyEventBuilder {
    method: String,
    path: String,
    headers: BTreeMap<String, Vec<String>>,
    query: BTreeMap<String, Vec<String>>,
    body: Option<String>,
    is_base64_encoded: bool,
    request_id: Option<String>,
}

impl ProxyEventBuilder {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
            body: None,
            is_base64_encoded: false,
            request_id: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new("GET", path)
    }

    pub fn post(path: &str) -> Self {
        Self::new("POST", path)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    /// Set a text body with a JSON content type.
    pub fn json_body(self, body: &str) -> Self {
        self.header("Content-Type", "application/json").body(body)
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self.is_base64_encoded = false;
        self
    }

    /// Set an already base64-encoded body.
    pub fn base64_body(mut self, encoded: &str) -> Self {
        self.body = Some(encoded.to_string());
        self.is_base64_encoded = true;
        self
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn build(&self) -> ApiGatewayProxyRequest {
        serde_json::from_value(self.to_value()).expect("builder emits valid proxy events")
    }

    /// The JSON payload the Lambda runtime would deliver.
    pub fn to_value(&self) -> Value {
        let last = |values: &BTreeMap<String, Vec<String>>| -> BTreeMap<String, String> {
            values
                .iter()
                .filter_map(|(k, v)| v.last().map(|last| (k.clone(), last.clone())))
                .collect()
        };

        json!({
            "resource": "/{proxy+}",
            "path": self.path,
            "httpMethod": self.method,
            "headers": last(&self.headers),
            "multiValueHeaders": self.headers,
            "queryStringParameters": last(&self.query),
            "multiValueQueryStringParameters": self.query,
            "pathParameters": {"proxy": self.path.trim_start_matches('/')},
            "stageVariables": {},
            "requestContext": {
                "accountId": "000000000000",
                "apiId": "greeter",
                "requestId": self.request_id,
                "stage": "test",
                "resourcePath": "/{proxy+}",
                "path": format!("/test{}", self.path),
                "httpMethod": self.method,
                "requestTimeEpoch": 0,
                "identity": {"sourceIp": "127.0.0.1"}
            },
            "body": self.body,
            "isBase64Encoded": self.is_base64_encoded
        })
    }
}

/// Wrap a proxy event as a runtime invocation with a default context.
pub fn lambda_event(event: &ApiGatewayProxyRequest) -> LambdaEvent<Value> {
    let payload = serde_json::to_value(event).expect("proxy events always serialize");
    LambdaEvent::new(payload, Context::default())
}

/// Wrap an arbitrary JSON payload as a runtime invocation.
pub fn raw_lambda_event(payload: Value) -> LambdaEvent<Value> {
    LambdaEvent::new(payload, Context::default())
}

/// Create a mock request ID for testing.
///
/// Returns a string in the format `test-request-{suffix}`.
pub fn mock_request_id(suffix: &str) -> String {
    format!("test-request-{}", suffix)
}

/// The response body as text; binary bodies are decoded lossily.
pub fn response_text(response: &ApiGatewayProxyResponse) -> String {
    match &response.body {
        Some(Body::Text(text)) => text.clone(),
        Some(Body::Binary(bytes)) => String::from_utf8_lossy(bytes).into_owned(),
        _ => String::new(),
    }
}

/// Extract the `message` field from a JSON proxy response body.
///
/// # Panics
///
/// Panics if the body is not a JSON object with a string `message`.
pub fn response_message(response: &ApiGatewayProxyResponse) -> String {
    let text = response_text(response);
    let body: Value = serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("response body is not JSON ({}): {}", e, text));
    body["message"]
        .as_str()
        .unwrap_or_else(|| panic!("response body has no message: {}", text))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn builder_sets_method_path_and_stage() {
        let event = ProxyEventBuilder::get("/hello-world").build();
        assert_eq!(event.http_method, Method::GET);
        assert_eq!(event.path.as_deref(), Some("/hello-world"));
        assert_eq!(event.request_context.stage.as_deref(), Some("test"));
    }

    #[test]
    fn builder_populates_single_and_multi_value_maps() {
        let payload = ProxyEventBuilder::get("/")
            .header("X-Test", "1")
            .query("q", "a")
            .query("q", "b")
            .to_value();
        assert_eq!(payload["headers"]["X-Test"], "1");
        assert_eq!(payload["multiValueHeaders"]["X-Test"], json!(["1"]));
        assert_eq!(payload["queryStringParameters"]["q"], "b");
        assert_eq!(payload["multiValueQueryStringParameters"]["q"], json!(["a", "b"]));
    }

    #[test]
    fn builder_json_body_sets_content_type() {
        let event = ProxyEventBuilder::post("/your-name").json_body("{}").build();
        assert_eq!(event.headers["content-type"], "application/json");
        assert_eq!(event.body.as_deref(), Some("{}"));
        assert!(!event.is_base64_encoded);
    }

    #[test]
    fn builder_payload_uses_api_gateway_keys() {
        let payload = ProxyEventBuilder::post("/your-name")
            .base64_body("e30=")
            .to_value();
        assert_eq!(payload["httpMethod"], "POST");
        assert_eq!(payload["isBase64Encoded"], true);
    }

    #[test]
    fn mock_request_id_formats_correctly() {
        assert_eq!(mock_request_id("123"), "test-request-123");
    }

    #[test]
    fn response_message_reads_message_field() {
        let response = ApiGatewayProxyResponse {
            status_code: 200,
            body: Some(Body::Text(r#"{"message":"hi"}"#.to_string())),
            ..ApiGatewayProxyResponse::default()
        };
        assert_eq!(response_message(&response), "hi");
    }
}
