//! Greeter HTTP API.
//!
//! This crate holds everything that is independent of the hosting platform:
//!
//! - [`NameRequest`] / [`MessageResponse`]: the JSON request and response shapes
//! - [`hello_world`] / [`greet`]: pure handlers returning an [`ApiResponse`]
//! - [`router`]: an explicitly constructed axum [`Router`](axum::Router) wiring
//!   the handlers to their routes
//!
//! # Architecture
//!
//! The router is built by the caller and handed to whichever transport hosts
//! it (the Lambda proxy adapter or the local HTTP service):
//!
//! ```text
//! ┌──────────────┐    ┌──────────┐    ┌──────────────────┐
//! │  transport   │ -> │  Router  │ -> │  hello_world()   │
//! │ (lambda/tcp) │ <- │          │ <- │  greet(body)     │
//! └──────────────┘    └──────────┘    └──────────────────┘
//! ```

#![deny(warnings)]

mod handlers;
mod models;
mod router;

pub use handlers::{
    greet, hello_world, ApiResponse, GreetOutcome, HELLO_WORLD_MESSAGE, INVALID_BODY_MESSAGE,
    MISSING_NAME_MESSAGE,
};
pub use models::{MessageResponse, NameRequest};
pub use router::{router, HELLO_WORLD_PATH, YOUR_NAME_PATH};
