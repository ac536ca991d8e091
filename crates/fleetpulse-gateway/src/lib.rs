//! FleetPulse gateway library entry.
//!
//! This crate wires the fixture store, config, observability, and the three
//! access modes (snapshot, stream, WebSocket) into one axum router. It is
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod transport;
