use anyhow::Context;
use info::InfoModule;
use tokio::net::TcpListener;

use crate::config::AppConfig;

/// Wire the info module and serve it until a shutdown signal arrives.
///
/// # Errors
/// Fails when the module cannot start or the address cannot be bound
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Initializing modules...");
    let module = InfoModule::init(config.info).await?;
    let router = module.router();

    let listener = TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated with an error")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Resolves on the first of Ctrl+C or SIGTERM. A listener that cannot be
/// installed is logged and left out, so the other one still stops the server.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "ctrl_c",
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for Ctrl+C");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "sigterm"
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending().await
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    let received = tokio::select! {
        name = ctrl_c => name,
        name = terminate => name,
    };
    tracing::info!(signal = received, "Shutdown signal received, draining connections");
}
