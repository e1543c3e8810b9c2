use std::sync::Arc;

use kindle_engine::{DeliveryPipeline, FetchSettings};
use kindle_logging::{kindle_info, kindle_warn, LogDestination};
use kindle_server::{AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env()?;
    kindle_logging::initialize(LogDestination::Terminal, config.log_level);

    log_banner(&config);
    let pipeline = DeliveryPipeline::from_settings(FetchSettings::default(), config.mail.clone());
    let state = Arc::new(AppState::new(pipeline));

    kindle_server::serve(&config, state).await
}

fn log_banner(config: &ServerConfig) {
    let status = config.mail.status();
    kindle_info!("Kindle Sender server on http://{}", config.bind_address());
    kindle_info!(
        "Kindle email: {}",
        config.mail.kindle_email.as_deref().unwrap_or("NOT CONFIGURED")
    );
    kindle_info!(
        "SMTP configured: {}",
        if status.smtp_configured { "yes" } else { "no" }
    );
    if !status.is_complete() {
        kindle_warn!("Deliveries will fail until SMTP_USERNAME, SMTP_PASSWORD and KINDLE_EMAIL are set");
    }
}
