//! Snapshot and stream routes, driven through the router without a socket.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::body::{to_bytes, Body, BodyDataStream};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use futures_util::StreamExt;
use serde_json::Value;
use tokio::time::{Duration, Instant};
use tower::ServiceExt;

use fleetpulse_core::FixtureStore;
use fleetpulse_gateway::app_state::AppState;
use fleetpulse_gateway::obs::FeedMode;
use fleetpulse_gateway::{config, router};

fn app() -> (Router, AppState) {
    let cfg = config::load_from_str("version: 1\n").unwrap();
    let state = AppState::new(cfg).unwrap();
    (router::build_router(state.clone()), state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn next_line(body: &mut BodyDataStream) -> Value {
    let chunk = body.next().await.expect("stream ended").expect("body error");
    let text = std::str::from_utf8(&chunk).unwrap();
    assert!(text.ends_with('\n'), "line must be newline terminated: {text:?}");
    assert_eq!(text.matches('\n').count(), 1, "one line per chunk");
    serde_json::from_str(text.trim_end()).unwrap()
}

fn assert_framing(line: &Value, store: &FixtureStore) {
    let arr = line.as_array().expect("array");
    assert_eq!(arr.len(), store.len());
    for (entry, desc) in arr.iter().zip(store.iter()) {
        assert_eq!(entry["id"], desc.id.as_str());
        assert_eq!(entry["name"], desc.name.as_str());
        let cpu = entry["cpu_load"].as_u64().unwrap();
        let mem = entry["memory_usage"].as_u64().unwrap();
        match entry["status"].as_str().unwrap() {
            "ONLINE" => {
                assert!((10..=99).contains(&cpu));
                assert!((15..=99).contains(&mem));
            }
            "MAINTENANCE" | "OFFLINE" => {
                assert_eq!(cpu, 0);
                assert_eq!(mem, 0);
            }
            other => panic!("unexpected status {other}"),
        }
    }
}

#[tokio::test]
async fn data_returns_fixtures_verbatim() {
    let (app, state) = app();
    let resp = app.oneshot(get("/data")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let v: Value = serde_json::from_slice(&bytes).unwrap();
    let expected = serde_json::to_value(state.fixtures().servers()).unwrap();
    assert_eq!(v, serde_json::json!({ "data": expected }));

    for entry in v["data"].as_array().unwrap() {
        assert!(entry.get("status").is_none());
        assert!(entry.get("cpu_load").is_none());
    }
}

#[tokio::test]
async fn data_rejects_other_methods() {
    let (app, _) = app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/data")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test(start_paused = true)]
async fn stream_lines_match_store_and_tick_once_per_second() {
    let (app, state) = app();
    let store = state.fixtures();

    let resp = app.oneshot(get("/stream")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");

    let mut body = resp.into_body().into_data_stream();
    let mut last = Instant::now();
    assert_framing(&next_line(&mut body).await, &store);

    for _ in 0..4 {
        let line = next_line(&mut body).await;
        let now = Instant::now();
        assert!(now - last >= Duration::from_secs(1), "ticks must not batch");
        last = now;
        assert_framing(&line, &store);
    }
}

#[tokio::test(start_paused = true)]
async fn dropping_one_stream_leaves_the_other_running() {
    let (app, state) = app();
    let metrics = state.metrics();

    let a = app.clone().oneshot(get("/stream")).await.unwrap();
    let b = app.oneshot(get("/stream")).await.unwrap();
    assert_eq!(metrics.active(FeedMode::Stream), 2);

    let mut a = a.into_body().into_data_stream();
    let mut b = b.into_body().into_data_stream();
    next_line(&mut a).await;
    next_line(&mut b).await;

    drop(a);
    assert_eq!(metrics.active(FeedMode::Stream), 1);

    for _ in 0..3 {
        assert_framing(&next_line(&mut b).await, &state.fixtures());
    }

    drop(b);
    assert_eq!(metrics.active(FeedMode::Stream), 0);
}

#[tokio::test]
async fn ops_endpoints() {
    let (app, _) = app();
    let resp = app.clone().oneshot(get("/healthz")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("fleetpulse_fixtures 4"));
}
