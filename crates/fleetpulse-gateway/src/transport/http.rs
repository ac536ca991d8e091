//! Plain HTTP access modes.
//!
//! - `/data`   : the fixture list as-is, no randomization
//! - `/stream` : unbounded body, one JSON array of snapshots per tick, `\n` terminated
//!
//! The stream never ends on its own. hyper drops the body when the client
//! goes away, which drops the loop state and releases the connection slot.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Json, Response},
};
use futures_util::stream::{self, Stream};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use fleetpulse_core::{randomize_all, FixtureStore, ServerDescriptor};

use crate::app_state::AppState;
use crate::obs::{ActiveGuard, FeedMode, GatewayMetrics};

#[derive(Debug, Serialize)]
pub struct SnapshotBody<'a> {
    pub data: &'a [ServerDescriptor],
}

pub async fn snapshot(State(app): State<AppState>) -> Response {
    let fixtures = app.fixtures();
    Json(SnapshotBody { data: fixtures.servers() }).into_response()
}

pub async fn stream(State(app): State<AppState>) -> Response {
    let metrics = app.metrics();
    let guard = metrics.track(FeedMode::Stream);
    tracing::debug!("stream client attached");

    let lines = metrics_lines(
        app.fixtures(),
        app.tick_interval(),
        StdRng::from_entropy(),
        metrics,
        guard,
    );

    (
        [(header::CONTENT_TYPE, "application/json")],
        Body::from_stream(lines),
    )
        .into_response()
}

struct StreamLoop {
    fixtures: Arc<FixtureStore>,
    every: Duration,
    rng: StdRng,
    metrics: Arc<GatewayMetrics>,
    first: bool,
    _active: ActiveGuard,
}

/// One line per tick: emit, then sleep `every` before the next one.
pub fn metrics_lines(
    fixtures: Arc<FixtureStore>,
    every: Duration,
    rng: StdRng,
    metrics: Arc<GatewayMetrics>,
    active: ActiveGuard,
) -> impl Stream<Item = Result<String, Infallible>> + Send + 'static {
    let state = StreamLoop {
        fixtures,
        every,
        rng,
        metrics,
        first: true,
        _active: active,
    };

    stream::unfold(state, |mut st| async move {
        if st.first {
            st.first = false;
        } else {
            tokio::time::sleep(st.every).await;
        }

        let snaps = randomize_all(&st.fixtures, &mut st.rng);
        let mut line = match serde_json::to_string(&snaps) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "stream tick serialization failed");
                return None;
            }
        };
        line.push('\n');

        st.metrics.record_tick(FeedMode::Stream);
        Some((Ok::<_, Infallible>(line), st))
    })
}
