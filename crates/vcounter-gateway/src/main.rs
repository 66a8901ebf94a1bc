//! vcounter gateway
//!
//! - Counter endpoint: GET `http.route` (default `/GetVisitorCount`)
//! - Store client built once from config/env, shared through `AppState`
//! - `/healthz`, `/readyz`, `/metrics`
//! - Graceful shutdown: readiness flips to draining, in-flight requests finish

use std::net::SocketAddr;
use std::process::ExitCode;

use vcounter_core::error::{CounterError, Result};
use vcounter_gateway::{app_state::AppState, config, obs, router};

#[tokio::main]
async fn main() -> ExitCode {
    // Config errors are reported before logging exists.
    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("vcounter: {e}");
            return ExitCode::FAILURE;
        }
    };
    obs::logging::init(&cfg.logging);

    match run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, code = e.client_code().as_str(), "vcounter-gateway exited");
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: config::ServiceConfig) -> Result<()> {
    let listen: SocketAddr = cfg
        .http
        .listen
        .parse()
        .map_err(|e| CounterError::Config(format!("http.listen must be a valid SocketAddr: {e}")))?;
    let route = cfg.http.route.clone();

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, %route, "vcounter-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| CounterError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| CounterError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
    state.set_draining();
    tracing::info!("signal received, draining");
}
