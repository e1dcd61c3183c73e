//! quintaedizione-api server binary.
//!
//! Reads settings from the environment (and `.env`), applies migrations, serves the catalog.

use quintaedizione_api::config::{all_resources, validate, Settings};
use quintaedizione_api::service::TracingLogger;
use quintaedizione_api::{apply_migrations, build_router, store, AppState, Repositories, StartupError};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("quintaedizione_api=info,tower_http=info")
            }),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let settings = Settings::from_env()?;
    validate(&all_resources())?;

    let pool = store::connect(&settings.database).await?;
    apply_migrations(&pool).await?;

    let state = AppState::new(
        Repositories::postgres(pool.clone()),
        Arc::new(pool.clone()),
        settings.version.clone(),
        Some(Arc::new(TracingLogger)),
    );
    let app = build_router(state, &settings.http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        version = %settings.version,
        "listening"
    );

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(async {
                rx.await.ok();
            })
            .await
    });

    shutdown_signal().await;
    tracing::info!(timeout = ?settings.server.shutdown_timeout, "shutting down");
    let _ = tx.send(());
    drain(server, settings.server.shutdown_timeout).await?;

    pool.close().await;
    tracing::info!("stopped");
    Ok(())
}

async fn drain(
    server: tokio::task::JoinHandle<std::io::Result<()>>,
    timeout: Duration,
) -> Result<(), StartupError> {
    match tokio::time::timeout(timeout, server).await {
        Ok(Ok(result)) => result.map_err(StartupError::from),
        Ok(Err(join)) => {
            tracing::error!(error = %join, "server task failed");
            Ok(())
        }
        Err(_) => {
            tracing::warn!("in-flight requests did not finish before the shutdown timeout");
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
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
}
