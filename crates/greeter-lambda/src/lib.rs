use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

use greeter_lambda_shared::{init_tracing, AdapterConfig, ApiGatewayProxyResponse, ProxyAdapter};

/// Entry point used by the Lambda runtime.
///
/// The router and adapter are built once at cold start and shared by every
/// invocation handled by this instance.
pub async fn run() -> Result<(), Error> {
    init_tracing();

    let config = AdapterConfig::from_env();
    let adapter = build_adapter(&config);

    info!(
        strip_base_path = adapter.strip_base_path().unwrap_or("-"),
        "greeter lambda initialized"
    );

    let adapter = &adapter;
    lambda_runtime::run(service_fn(move |event| async move {
        handler(adapter, event).await
    }))
    .await
}

/// Wire the greeter router into a proxy adapter.
pub fn build_adapter(config: &AdapterConfig) -> ProxyAdapter {
    ProxyAdapter::from_config(greeter_api::router(), config)
}

/// Lambda handler invoked per request.
pub async fn handler(
    adapter: &ProxyAdapter,
    event: LambdaEvent<Value>,
) -> Result<ApiGatewayProxyResponse, Error> {
    adapter.handle(event).await
}
