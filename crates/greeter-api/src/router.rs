//! Route table for the greeter API.

use axum::{
    body::Bytes,
    extract::DefaultBodyLimit,
    response::IntoResponse,
    routing::{get, post},
    Extension, Router,
};

use crate::handlers::{self, ApiResponse, GreetOutcome};

pub const HELLO_WORLD_PATH: &str = "/hello-world";
pub const YOUR_NAME_PATH: &str = "/your-name";

/// Build the greeter router.
///
/// The router carries no state. Callers own the returned value and pass it
/// to whatever transport serves it; cloning it is cheap.
///
/// `/your-name` reads bodies of any size; the transport in front of it owns
/// the payload cap.
///
/// # Example
///
/// ```
/// let app = greeter_api::router();
/// # let _ = app;
/// ```
pub fn router() -> Router {
    Router::new()
        .route(HELLO_WORLD_PATH, get(hello_world_route))
        .route(
            YOUR_NAME_PATH,
            post(your_name_route).layer(DefaultBodyLimit::disable()),
        )
}

async fn hello_world_route() -> ApiResponse {
    handlers::hello_world()
}

async fn your_name_route(body: Bytes) -> impl IntoResponse {
    let outcome = GreetOutcome::evaluate(&body);
    let response = ApiResponse::from(&outcome);
    (Extension(outcome), response)
}
