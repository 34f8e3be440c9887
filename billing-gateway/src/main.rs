use billing_gateway::{config::Config, Application, SERVICE_NAME};
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging depends on configuration, so a bad config is reported on stderr.
    let config = Config::load()?;

    init_tracing(
        SERVICE_NAME,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )?;

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
