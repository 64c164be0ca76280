//! Bridge server: loads settings from env (and `.env`), opens the SQLite pool, applies bundled
//! migrations, and serves common routes plus `/api` table routes until Ctrl-C or SIGTERM.

use table_bridge::{app, connect, run_migrations, AppState, BridgeConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("table_bridge=info,table_bridge_server=info,tower_http=info")),
        )
        .init();

    let config = BridgeConfig::from_env()?;
    let pool = connect(&config).await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    let state = AppState::new(pool.clone(), config.tables.clone());
    let router = app(state, config.body_limit_bytes);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("=== Web API Listening on http://{} ===", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("storage pool closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
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
    tracing::info!("shutdown signal received");
}
