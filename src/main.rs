use std::sync::Arc;

use anyhow::Context;

use reguease::config::WizardConfig;
use reguease::wizard::{SimulatedBackend, TaskBackend, WizardController, WizardRouteState, wizard_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = WizardConfig::from_env()?;

    eprintln!("ReguEase v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://{}:{}/api/wizard/state", config.bind_addr, config.port);
    eprintln!(
        "   Simulated backend latency: {}ms",
        config.simulated_latency.as_millis()
    );
    eprintln!("   Documents required: {}", config.min_documents);

    let backend: Arc<dyn TaskBackend> = Arc::new(SimulatedBackend::new(config.simulated_latency));
    let controller = Arc::new(WizardController::new(backend, &config));
    tracing::info!(session_id = %controller.session_id(), "Wizard session started");

    let app = wizard_routes(WizardRouteState { controller });

    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "Wizard server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
