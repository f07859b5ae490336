use greeter_service_shared::{
    init_logging, init_metrics, LoggingConfig, MetricsConfig, ServiceConfig, SERVICE_NAME,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service(SERVICE_NAME);
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    let metrics_path = match init_metrics(&metrics_config) {
        Ok(()) => Some(metrics_config.path.as_str()),
        Err(e) => {
            tracing::warn!(error = %e, "continuing without metrics");
            None
        }
    };

    let config = ServiceConfig::from_env().map_err(|e| {
        error!(error = %e, "invalid service configuration");
        e
    })?;

    let app = greeter_service::app(metrics_path);

    let addr = config.socket_addr();
    info!(addr = %addr, metrics = ?metrics_path, "starting greeter service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
