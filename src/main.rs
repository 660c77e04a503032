use anyhow::Result;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trelix_nlp_gateway::{routes, AppState, Config, ModelFactory};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("trelix_nlp_gateway=debug,tower_http=debug")),
        )
        .init();

    let config = Config::discover()?;

    // Models are loaded once and shared read-only by every request
    let models = ModelFactory::load(&config.model_config).await?;
    info!(
        "Models loaded: translator={}, recognizer={}",
        models.translator.name(),
        models.recognizer.name()
    );

    let server_config = config.server_config.clone();
    info!("Allowed origins: {:?}", server_config.cors_origins);

    let app_state = AppState::new(config, models);
    let app = routes::build_router(app_state)?;

    let listener =
        tokio::net::TcpListener::bind((server_config.host.as_str(), server_config.port)).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
