//! WebSocket feed.
//!
//! Lifecycle per connection: Connecting -> Open -> Closed.
//! - axum accepts the upgrade; a failed handshake never reaches this module.
//! - While open: send one `{"value": n}` text frame, then wait one tick.
//! - A failed send or a peer close ends the session. A close frame is
//!   attempted best-effort and the error is dropped. No retry.

use std::sync::Arc;

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, State},
    response::Response,
};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::Duration;
use tracing::Instrument;

use fleetpulse_core::error::{FleetPulseError, Result};
use fleetpulse_core::ScalarTick;

use crate::app_state::AppState;
use crate::obs::{FeedMode, GatewayMetrics};

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| {
        let span = tracing::info_span!("ws_session", route = "/ws");
        run_session(app, socket).instrument(span)
    })
}

async fn run_session(app: AppState, socket: WebSocket) {
    let (ws_tx, ws_rx) = socket.split();
    run_feed(ws_tx, ws_rx, app.tick_interval(), app.metrics()).await;
    tracing::debug!("ws session closed");
}

// --------------------
// Core feed loop
// --------------------

/// Push ticks into `tx` until a send fails or `rx` reports the peer is gone.
pub async fn run_feed<S, R, E>(
    mut tx: S,
    mut rx: R,
    every: Duration,
    metrics: Arc<GatewayMetrics>,
) where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
    R: Stream<Item = std::result::Result<Message, E>> + Unpin,
{
    let _active = metrics.track(FeedMode::Ws);
    let mut rng = StdRng::from_entropy();

    loop {
        if send_tick(&mut tx, ScalarTick::random(&mut rng)).await.is_err() {
            break;
        }
        metrics.record_tick(FeedMode::Ws);

        if !wait_next_tick(&mut rx, every).await {
            break;
        }
    }

    // best-effort close handshake
    let _ = tx.send(Message::Close(None)).await;
    let _ = tx.close().await;
}

async fn send_tick<S>(tx: &mut S, tick: ScalarTick) -> Result<()>
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    tx.send(Message::Text(tick.to_json()))
        .await
        .map_err(|e| FleetPulseError::Transport(e.to_string()))
}

/// Sleep one tick while draining inbound frames. Returns false once the peer is gone.
///
/// Inbound traffic never shortens the tick; only close or a read error does.
async fn wait_next_tick<R, E>(rx: &mut R, every: Duration) -> bool
where
    R: Stream<Item = std::result::Result<Message, E>> + Unpin,
{
    let pause = tokio::time::sleep(every);
    tokio::pin!(pause);

    loop {
        tokio::select! {
            _ = &mut pause => return true,
            incoming = rx.next() => match incoming {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return false,
                Some(Ok(_)) => {}
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    type SinkResult = std::result::Result<(), &'static str>;

    use futures_util::stream;

    use super::*;

    /// Accepts `ok_sends` frames, then refuses every send like a dead socket.
    #[derive(Default)]
    struct BrokenAfter {
        ok_sends: usize,
        sent: usize,
        closed: bool,
    }

    impl Sink<Message> for BrokenAfter {
        type Error = &'static str;

        fn poll_ready(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<SinkResult> {
            if self.sent < self.ok_sends {
                Poll::Ready(Ok(()))
            } else {
                Poll::Ready(Err("broken pipe"))
            }
        }

        fn start_send(mut self: Pin<&mut Self>, _: Message) -> SinkResult {
            self.sent += 1;
            Ok(())
        }

        fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<SinkResult> {
            Poll::Ready(Ok(()))
        }

        fn poll_close(mut self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<SinkResult> {
            self.closed = true;
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn send_failure_ends_feed_without_retry() {
        let metrics = Arc::new(GatewayMetrics::default());
        let mut tx = BrokenAfter {
            ok_sends: 3,
            ..Default::default()
        };
        let rx = stream::pending::<std::result::Result<Message, &'static str>>();

        tokio::time::timeout(
            Duration::from_secs(60),
            run_feed(&mut tx, rx, Duration::from_secs(1), Arc::clone(&metrics)),
        )
        .await
        .expect("feed must stop on the first failed send");

        assert_eq!(tx.sent, 3);
        assert!(tx.closed, "close is still attempted");
        assert_eq!(metrics.ticks.get(&[("mode", "ws")]), 3);
        assert_eq!(metrics.active(FeedMode::Ws), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn peer_close_ends_feed() {
        let metrics = Arc::new(GatewayMetrics::default());
        let mut tx = BrokenAfter {
            ok_sends: usize::MAX,
            ..Default::default()
        };
        let rx = stream::iter(vec![
            Ok::<_, &'static str>(Message::Text("hi".into())),
            Ok(Message::Close(None)),
        ]);

        run_feed(&mut tx, rx, Duration::from_secs(1), Arc::clone(&metrics)).await;

        // one tick plus the close frame
        assert_eq!(tx.sent, 2);
        assert!(tx.closed);
        assert_eq!(metrics.ticks.get(&[("mode", "ws")]), 1);
        assert_eq!(metrics.active(FeedMode::Ws), 0);
    }
}
