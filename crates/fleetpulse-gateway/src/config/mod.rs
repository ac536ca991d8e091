//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use fleetpulse_core::error::{FleetPulseError, Result};

pub use schema::{FixtureEntry, GatewayConfig, GatewaySection};

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "fleetpulse.yaml";

/// Resolve the config: explicit path, else `fleetpulse.yaml` if present, else defaults.
pub fn load(path: Option<&str>) -> Result<GatewayConfig> {
    match path {
        Some(p) => load_from_file(p),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH),
        None => Ok(GatewayConfig::default()),
    }
}

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| FleetPulseError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| FleetPulseError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
