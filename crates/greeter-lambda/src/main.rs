//! AWS Lambda function serving the greeter API.
//!
//! Requests arrive as API Gateway proxy events and are answered by the
//! greeter router through the proxy adapter.

use lambda_runtime::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    greeter_lambda::run().await
}
