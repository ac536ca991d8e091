//! FleetPulse companion client.
//!
//! Connects to the gateway's WebSocket feed and prints every text frame on
//! its own line until the server closes the connection. No reconnect.
//!
//! Usage: `fleetpulse-client [ws://127.0.0.1:8000/ws]`

use std::process::ExitCode;

use futures_util::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing_subscriber::{fmt, EnvFilter};

use fleetpulse_core::error::{FleetPulseError, Result};

const DEFAULT_URL: &str = "ws://127.0.0.1:8000/ws";

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let url = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string());
    match run(&url).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.client_code().as_str(), error = %e, %url, "fleetpulse-client failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(url: &str) -> Result<()> {
    let (mut ws, _) = connect_async(url)
        .await
        .map_err(|e| FleetPulseError::Transport(format!("connect failed: {e}")))?;
    tracing::info!(%url, "connected");

    while let Some(msg) = ws.next().await {
        match msg.map_err(|e| FleetPulseError::Transport(e.to_string()))? {
            Message::Text(text) => println!("{text}"),
            Message::Close(frame) => {
                tracing::info!(?frame, "server closed the feed");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}
