pub mod api;
pub mod config;
pub mod i18n;
pub mod pipeline;
pub mod state;

use tracing_subscriber::EnvFilter;

use crate::state::{AppState, StartupError};

/// Start the web app and block until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = config::AppConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    let mut server = api::start_server(state, config.bind_addr)
        .await
        .map_err(StartupError::Server)?;
    tracing::info!("Open http://{} in a browser", server.addr);

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl-C: {e}");
    }
    server.shutdown();
    Ok(())
}
