//! Transport layer.
//!
//! `http` serves the snapshot and the chunked stream; `ws` runs the WebSocket
//! feed. Each connection gets its own tick loop and its own RNG.

pub mod http;
pub mod ws;
