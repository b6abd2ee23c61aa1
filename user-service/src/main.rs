use service_core::observability::init_tracing;
use user_service::config::UserServiceConfig;
use user_service::services::init_metrics;
use user_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = UserServiceConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "user-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )
    .map_err(|e| std::io::Error::other(e.to_string()))?;

    // Must run before any metric is recorded.
    init_metrics().map_err(|e| std::io::Error::other(e.to_string()))?;

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    application.run_until_stopped().await
}
