//! API Gateway proxy adapter for the greeter Lambda.
//!
//! This crate is the only place that knows about the hosting platform's
//! event format:
//!
//! - [`ApiGatewayProxyRequest`] / [`ApiGatewayProxyResponse`]: API Gateway REST
//!   proxy event shapes, re-exported from `aws_lambda_events`
//! - [`ProxyAdapter`]: drives an axum router with a proxy event and converts
//!   the result back
//! - [`AdapterError`]: translation failures, reported as failed invocations
//! - [`AdapterConfig`]: environment configuration read at cold start
//! - [`init_tracing`]: JSON-formatted tracing for CloudWatch Logs
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides event builders for handler tests.
//! Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

mod adapter;
mod config;
mod error;
mod tracing_init;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapter::{to_proxy_response, ProxyAdapter};
pub use config::{AdapterConfig, STRIP_BASE_PATH_ENV};
pub use error::AdapterError;
pub use tracing_init::init_tracing;

pub use aws_lambda_events::apigw::{
    ApiGatewayProxyRequest, ApiGatewayProxyRequestContext, ApiGatewayProxyResponse,
};
pub use aws_lambda_events::encodings::Body as ProxyBody;
