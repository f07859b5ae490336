//! Adapter-level errors.
//!
//! These are distinct from any 4xx a handler returns: a handler response is
//! always a well-formed proxy response, whereas an `AdapterError` means the
//! invocation itself could not be translated and is reported to the Lambda
//! runtime as a failed invocation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// The payload is not an API Gateway proxy event.
    #[error("invalid proxy event: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    #[error("invalid request URI '{uri}': {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: http::uri::InvalidUri,
    },

    #[error("invalid request path: {0}")]
    InvalidPath(#[from] url::ParseError),

    #[error("could not decode base64 request body: {0}")]
    InvalidBody(#[from] base64::DecodeError),

    #[error("failed to read response body: {0}")]
    ResponseBody(#[source] axum::Error),
}
