use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use roastline::application::services::{RoastService, TranscriptionAdapter};
use roastline::infrastructure::audio::TranscriptionEngineFactory;
use roastline::infrastructure::observability::{TracingConfig, init_tracing};
use roastline::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(&settings.logging, environment));

    let loader = TranscriptionEngineFactory::from_settings(&settings.transcription);
    tracing::info!(
        provider = ?loader.provider(),
        model = %settings.transcription.model,
        language = %settings.transcription.language,
        "Transcription engine configured"
    );

    let transcription = Arc::new(TranscriptionAdapter::new(Arc::new(loader)));
    // Requests are served while the model loads; audio calls get 503 until then.
    transcription.spawn_initialize();

    let state = AppState {
        roast_service: Arc::new(RoastService::new(Arc::clone(&transcription))),
        settings: settings.clone(),
    };

    let router = create_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
