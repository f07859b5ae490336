//! Wiring between API Gateway proxy events and an axum router.
//!
//! [`ProxyAdapter`] owns an axum [`Router`] and, for each invocation:
//!
//! 1. decodes the payload as an [`ApiGatewayProxyRequest`]
//! 2. rebuilds the `http::Request` and drives it through the router with
//!    `tower::ServiceExt::oneshot`
//! 3. collects the `http::Response` into an [`ApiGatewayProxyResponse`]
//!
//! The adapter adds no behaviour of its own. A 4xx from the router is a
//! normal response; only translation failures surface as [`AdapterError`].

use std::time::Instant;

use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body as ProxyBody;
use axum::body::Body;
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::{Request, Response, Uri};
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tower::ServiceExt;
use tracing::{error, info};
use url::Url;

use crate::config::AdapterConfig;
use crate::error::AdapterError;

/// Placeholder origin used only to let `Url` normalise and encode the path
/// and query; it never appears in the request handed to the router.
const BASE_URL: &str = "http://localhost";

/// Lambda-side proxy for an axum router.
///
/// Cloning is cheap; the router is reference counted internally.
///
/// # Example
///
/// ```no_run
/// use greeter_lambda_shared::ProxyAdapter;
///
/// # async fn run() -> Result<(), lambda_runtime::Error> {
/// let adapter = ProxyAdapter::new(axum::Router::new()).with_strip_base_path("/test");
/// let adapter = &adapter;
/// lambda_runtime::run(lambda_runtime::service_fn(move |event| async move {
///     adapter.handle(event).await
/// }))
/// .await
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ProxyAdapter {
    router: Router,
    strip_base_path: Option<String>,
}

impl ProxyAdapter {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            strip_base_path: None,
        }
    }

    /// Build an adapter from environment-derived configuration.
    pub fn from_config(router: Router, config: &AdapterConfig) -> Self {
        let adapter = Self::new(router);
        match config.strip_base_path.as_deref() {
            Some(base_path) => adapter.with_strip_base_path(base_path),
            None => adapter,
        }
    }

    /// Strip `base_path` from the front of every inbound path.
    ///
    /// The value is normalised to a single leading slash and no trailing
    /// slash. Empty values and `/` disable stripping.
    pub fn with_strip_base_path(mut self, base_path: &str) -> Self {
        let trimmed = base_path.trim().trim_matches('/');
        self.strip_base_path = if trimmed.is_empty() {
            None
        } else {
            Some(format!("/{}", trimmed))
        };
        self
    }

    pub fn strip_base_path(&self) -> Option<&str> {
        self.strip_base_path.as_deref()
    }

    /// Lambda runtime entry point.
    ///
    /// A payload that is not a proxy event is returned as an error so the
    /// runtime reports a failed invocation.
    pub async fn handle(
        &self,
        event: LambdaEvent<Value>,
    ) -> Result<ApiGatewayProxyResponse, Error> {
        let invocation_id = event.context.request_id.clone();

        let request: ApiGatewayProxyRequest = match serde_json::from_value(event.payload) {
            Ok(request) => request,
            Err(e) => {
                error!(invocation_id = %invocation_id, error = %e, "failed to decode proxy event");
                return Err(AdapterError::from(e).into());
            }
        };

        match self.proxy(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                error!(invocation_id = %invocation_id, error = %e, "failed to proxy request");
                Err(e.into())
            }
        }
    }

    /// Decode a raw JSON payload and proxy it.
    pub async fn proxy_value(&self, payload: Value) -> Result<ApiGatewayProxyResponse, AdapterError> {
        let request: ApiGatewayProxyRequest = serde_json::from_value(payload)?;
        self.proxy(request).await
    }

    /// Proxy a single event through the router.
    pub async fn proxy(
        &self,
        event: ApiGatewayProxyRequest,
    ) -> Result<ApiGatewayProxyResponse, AdapterError> {
        let start = Instant::now();
        let request_id = event.request_context.request_id.clone();

        let request = self.to_http_request(event)?;
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let response = match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };

        let proxy_response = to_proxy_response(response).await?;

        info!(
            request_id = request_id.as_deref().unwrap_or("-"),
            method = %method,
            path = %path,
            status = proxy_response.status_code,
            base64 = proxy_response.is_base64_encoded,
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            "request completed"
        );

        Ok(proxy_response)
    }

    /// Rebuild the HTTP request described by a proxy event.
    ///
    /// Multi-value headers and query parameters win over their single-value
    /// counterparts when both are present. The request context travels with
    /// the request as an extension.
    pub fn to_http_request(
        &self,
        event: ApiGatewayProxyRequest,
    ) -> Result<Request<Body>, AdapterError> {
        let uri = self.request_uri(&event)?;

        let body = match event.body {
            Some(body) if event.is_base64_encoded => STANDARD.decode(body.as_bytes())?,
            Some(body) => body.into_bytes(),
            None => Vec::new(),
        };

        let mut request = Request::new(Body::from(body));
        *request.method_mut() = event.http_method;
        *request.uri_mut() = uri;
        *request.headers_mut() = if event.multi_value_headers.is_empty() {
            event.headers
        } else {
            event.multi_value_headers
        };
        request.extensions_mut().insert(event.request_context);

        Ok(request)
    }

    fn request_uri(&self, event: &ApiGatewayProxyRequest) -> Result<Uri, AdapterError> {
        let mut path = event.path.clone().unwrap_or_default();

        if let Some(base_path) = self.strip_base_path.as_deref() {
            if path == base_path {
                path.clear();
            } else if path.starts_with(base_path) && path[base_path.len()..].starts_with('/') {
                path.drain(..base_path.len());
            }
        }

        if !path.starts_with('/') {
            path.insert(0, '/');
        }

        let mut url = Url::parse(BASE_URL)?;
        url.set_path(&path);

        let mut params: Vec<(&str, &str)> =
            event.multi_value_query_string_parameters.iter().collect();
        if params.is_empty() {
            params = event.query_string_parameters.iter().collect();
        }
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        let path_and_query = &url[url::Position::BeforePath..];
        path_and_query
            .parse::<Uri>()
            .map_err(|source| AdapterError::InvalidUri {
                uri: path_and_query.to_string(),
                source,
            })
    }
}

/// Collect a router response into the proxy response shape.
///
/// Bodies that are valid UTF-8 are returned as text; anything else is
/// returned as binary, which serializes as base64 with `isBase64Encoded`
/// set. API Gateway's `headers` map carries the first value of each header.
pub async fn to_proxy_response(
    response: Response<Body>,
) -> Result<ApiGatewayProxyResponse, AdapterError> {
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(AdapterError::ResponseBody)?;

    let (body, is_base64_encoded) = if bytes.is_empty() {
        (None, false)
    } else {
        match String::from_utf8(bytes.to_vec()) {
            Ok(text) => (Some(ProxyBody::Text(text)), false),
            Err(e) => (Some(ProxyBody::Binary(e.into_bytes())), true),
        }
    };

    Ok(ApiGatewayProxyResponse {
        status_code: i64::from(parts.status.as_u16()),
        headers: parts.headers.clone(),
        multi_value_headers: parts.headers,
        body,
        is_base64_encoded,
        ..ApiGatewayProxyResponse::default()
    })
}
