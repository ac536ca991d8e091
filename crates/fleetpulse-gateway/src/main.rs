//! FleetPulse Gateway
//!
//! - `GET /data`   : fixture list as one JSON document
//! - `GET /stream` : randomized metrics, one JSON array per line, one line per tick
//! - `GET /ws`     : WebSocket feed of `{"value": n}` frames, one per tick
//!
//! Usage: `fleetpulse-gateway [config.yaml]`

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use fleetpulse_core::error::{FleetPulseError, Result};
use fleetpulse_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.client_code().as_str(), error = %e, "fleetpulse-gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1);
    let cfg = config::load(path.as_deref())?;
    let listen = cfg.gateway.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, "fleetpulse-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| FleetPulseError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| FleetPulseError::Internal(format!("server failed: {e}")))
}
