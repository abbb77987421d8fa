use carprice::{config, model, observability, server};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Init
    observability::init_tracing();
    model::loader::init_ort()?;

    // 2. Load Config
    let config = config::AppConfig::from_env()?;

    // 3. Load the model; a failure here exits before the port is bound
    let service = match model::loader::load_service(&config.model) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!(error = %e, "model failed to load; refusing to start");
            return Err(e.into());
        }
    };

    let mut state = server::types::AppState::new(service);
    if config.metrics.enabled {
        state = state.with_metrics(observability::install_metrics()?);
    }

    // 4. Create Router
    let app = server::routes::build_app(state, &config);

    // 5. Bind & Serve
    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
