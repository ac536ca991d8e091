//! Shared application state for the FleetPulse gateway.
//!
//! Everything in here is read-only after startup, so cloning the state per
//! request is just a couple of `Arc` bumps.

use std::sync::Arc;
use std::time::Duration;

use fleetpulse_core::error::Result;
use fleetpulse_core::FixtureStore;

use crate::config::GatewayConfig;
use crate::obs::GatewayMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    fixtures: Arc<FixtureStore>,
    metrics: Arc<GatewayMetrics>,
}

struct AppStateInner {
    cfg: GatewayConfig,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let fixtures = cfg.fixture_store()?;
        tracing::debug!(fixtures = fixtures.len(), "fixture store ready");

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            fixtures: Arc::new(fixtures),
            metrics: Arc::new(GatewayMetrics::default()),
        })
    }

    pub fn fixtures(&self) -> Arc<FixtureStore> {
        Arc::clone(&self.fixtures)
    }

    pub fn tick_interval(&self) -> Duration {
        self.inner.cfg.gateway.tick_interval()
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }
}
