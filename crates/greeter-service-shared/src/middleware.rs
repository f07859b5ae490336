//! HTTP middleware for the greeter service.
//!
//! - [`RequestId`]: correlation ID taken from `X-Request-ID` or generated
//! - [`MetricsLayer`]: tower layer that opens a request span, records HTTP
//!   metrics, counts `/your-name` outcomes and echoes the request ID back
//!
//! # Metrics Recording
//!
//! - `http_requests_total`: counter by method, path, status bucket
//! - `http_request_duration_seconds`: histogram by method, path
//!
//! The `path` label is the matched route template, or `unmatched` when no
//! route accepted the request.
//! - `greeter_greetings_total`: counter by outcome, from the
//!   [`GreetOutcome`] the router attaches to `/your-name` responses

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::extract::MatchedPath;
use axum::http::{HeaderMap, HeaderValue, Request, Response};
use greeter_api::GreetOutcome;
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::{info_span, Span};
use uuid::Uuid;

use crate::health::SERVICE_NAME;
use crate::metrics::record_greeting;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// `path` label for requests that matched no route.
pub const UNMATCHED_ROUTE: &str = "unmatched";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a time-sortable UUID v7 request ID.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Use the caller's `X-Request-ID` when present, non-empty and valid UTF-8;
/// otherwise generate one.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

fn status_bucket(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Tower layer for request tracking and metrics.
#[derive(Debug, Clone, Default)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsMiddleware { inner }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    ResBody: http_body::Body,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = MetricsFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let route = req
            .extensions()
            .get::<MatchedPath>()
            .map(|matched| matched.as_str().to_string())
            .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

        let request_id = extract_or_generate_request_id(req.headers());
        req.extensions_mut().insert(request_id.clone());

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %method,
            path = %path,
        );

        {
            let _enter = span.enter();
            tracing::info!("handling request");
        }

        let future = {
            let _enter = span.enter();
            self.inner.call(req)
        };

        MetricsFuture {
            inner: future,
            start,
            method,
            route,
            request_id,
            span,
        }
    }
}

pin_project! {
    /// Future wrapper that records metrics on completion.
    pub struct MetricsFuture<F> {
        #[pin]
        inner: F,
        start: Instant,
        method: String,
        route: String,
        request_id: RequestId,
        span: Span,
    }
}

impl<F, ResBody, E> Future for MetricsFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _enter = this.span.enter();

        let mut result = match this.inner.poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(result) => result,
        };

        let duration_secs = this.start.elapsed().as_secs_f64();

        metrics::histogram!(
            "http_request_duration_seconds",
            "method" => this.method.clone(),
            "path" => this.route.clone()
        )
        .record(duration_secs);

        match &mut result {
            Ok(response) => {
                let status = response.status().as_u16();

                metrics::counter!(
                    "http_requests_total",
                    "method" => this.method.clone(),
                    "path" => this.route.clone(),
                    "status" => status_bucket(status)
                )
                .increment(1);

                if let Some(outcome) = response.extensions().get::<GreetOutcome>() {
                    record_greeting(outcome.label(), SERVICE_NAME);
                }

                if let Ok(value) = HeaderValue::from_str(this.request_id.as_str()) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }

                tracing::info!(
                    status = status,
                    latency_ms = duration_secs * 1000.0,
                    "request completed"
                );
            }
            Err(_) => {
                metrics::counter!(
                    "http_requests_total",
                    "method" => this.method.clone(),
                    "path" => this.route.clone(),
                    "status" => "5xx"
                )
                .increment(1);

                tracing::error!(latency_ms = duration_secs * 1000.0, "request failed");
            }
        }

        Poll::Ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generate() {
        let id1 = RequestId::generate();
        let id2 = RequestId::generate();
        assert_ne!(id1, id2);
        assert_eq!(id1.as_str().len(), 36);
    }

    #[test]
    fn test_extract_request_id_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("test-123"));
        assert_eq!(extract_or_generate_request_id(&headers).as_str(), "test-123");
    }

    #[test]
    fn test_extract_request_id_generates_when_missing_or_empty() {
        assert_eq!(extract_or_generate_request_id(&HeaderMap::new()).as_str().len(), 36);

        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static(""));
        assert_eq!(extract_or_generate_request_id(&headers).as_str().len(), 36);
    }

    #[test]
    fn test_status_bucket() {
        assert_eq!(status_bucket(200), "2xx");
        assert_eq!(status_bucket(302), "3xx");
        assert_eq!(status_bucket(400), "4xx");
        assert_eq!(status_bucket(404), "4xx");
        assert_eq!(status_bucket(503), "5xx");
        assert_eq!(status_bucket(99), "other");
    }

    #[tokio::test]
    async fn test_layer_echoes_request_id() {
        use axum::body::Body;
        use tower::ServiceExt;

        let app = greeter_api::router().layer(MetricsLayer);
        let request = Request::get("/hello-world")
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
    }

    #[tokio::test]
    async fn test_layer_generates_request_id() {
        use axum::body::Body;
        use tower::ServiceExt;

        let app = greeter_api::router().layer(MetricsLayer);
        let request = Request::post("/your-name")
            .body(Body::from("{}"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), 400);
        assert_eq!(response.headers()[REQUEST_ID_HEADER].len(), 36);
    }

    async fn send_through_layer(method: &str, uri: &str, body: &'static str) {
        use axum::body::Body;
        use tower::ServiceExt;

        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body))
            .unwrap();
        greeter_api::router()
            .layer(MetricsLayer)
            .oneshot(request)
            .await
            .unwrap();
    }

    #[test]
    fn test_layer_counts_each_greeting_outcome() {
        use crate::metrics::{testing, GREETINGS_TOTAL};

        let rendered = testing::render_local(async {
            send_through_layer("POST", "/your-name", r#"{"name":"Wim"}"#).await;
            send_through_layer("POST", "/your-name", "not json").await;
            send_through_layer("POST", "/your-name", "{}").await;
            send_through_layer("GET", "/hello-world", "").await;
        });

        for outcome in ["greeted", "invalid_body", "missing_name"] {
            let label = format!(r#"outcome="{}""#, outcome);
            assert_eq!(
                testing::sample(&rendered, GREETINGS_TOTAL, &[&label, r#"service="greeter""#]),
                Some(1.0),
                "{}",
                outcome
            );
        }
    }

    #[test]
    fn test_layer_labels_by_route_template() {
        use crate::metrics::testing;

        let rendered = testing::render_local(async {
            send_through_layer("GET", "/hello-world", "").await;
            send_through_layer("GET", "/scan/1", "").await;
            send_through_layer("GET", "/scan/2", "").await;
        });

        assert_eq!(
            testing::sample(
                &rendered,
                "http_requests_total",
                &[r#"path="/hello-world""#, r#"status="2xx""#]
            ),
            Some(1.0)
        );
        assert_eq!(
            testing::sample(
                &rendered,
                "http_requests_total",
                &[r#"path="unmatched""#, r#"status="4xx""#]
            ),
            Some(2.0)
        );
        assert!(!rendered.contains("/scan/"));
    }
}
