use std::net::SocketAddr;
use std::time::Duration;

use fleetpulse_core::error::{FleetPulseError, Result};
use fleetpulse_core::{FixtureStore, ServerDescriptor};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    /// Replaces the built-in fixture list when present.
    #[serde(default)]
    pub fixtures: Option<Vec<FixtureEntry>>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            fixtures: None,
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(FleetPulseError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        if matches!(&self.fixtures, Some(list) if list.is_empty()) {
            return Err(FleetPulseError::BadRequest("fixtures must not be empty".into()));
        }

        self.gateway.validate()?;
        self.fixture_store()?;

        Ok(())
    }

    /// Build the read-only fixture store this config describes.
    pub fn fixture_store(&self) -> Result<FixtureStore> {
        match &self.fixtures {
            None => Ok(FixtureStore::default()),
            Some(list) => FixtureStore::new(list.iter().cloned().map(ServerDescriptor::from).collect()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(10..=60000).contains(&self.tick_interval_ms) {
            return Err(FleetPulseError::BadRequest(
                "gateway.tick_interval_ms must be between 10 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            FleetPulseError::BadRequest(format!("gateway.listen must be a valid SocketAddr: {e}"))
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn default_listen() -> String {
    "127.0.0.1:8000".into()
}
fn default_tick_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureEntry {
    pub id: String,
    pub name: String,
    pub ip_address: String,
    pub location: String,
}

impl From<FixtureEntry> for ServerDescriptor {
    fn from(e: FixtureEntry) -> Self {
        ServerDescriptor::new(e.id, e.name, e.ip_address, e.location)
    }
}
