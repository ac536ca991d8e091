//! Metrics randomizer.
//!
//! Decorates a `ServerDescriptor` with a synthetic status and load figures.
//! Status weighting is 3 ONLINE : 1 MAINTENANCE : 1 OFFLINE. Load is only
//! drawn for ONLINE servers; every other status reports zero.

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::fixture::{FixtureStore, ServerDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerStatus {
    Online,
    Maintenance,
    Offline,
}

impl ServerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ServerStatus::Online => "ONLINE",
            ServerStatus::Maintenance => "MAINTENANCE",
            ServerStatus::Offline => "OFFLINE",
        }
    }
}

/// Uniform choice over this list yields the 3:1:1 weighting.
pub const STATUS_WEIGHTS: [ServerStatus; 5] = [
    ServerStatus::Online,
    ServerStatus::Online,
    ServerStatus::Online,
    ServerStatus::Maintenance,
    ServerStatus::Offline,
];

pub const CPU_LOAD_RANGE: RangeInclusive<u8> = 10..=99;
pub const MEMORY_USAGE_RANGE: RangeInclusive<u8> = 15..=99;

/// Descriptor plus one tick's worth of synthetic metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMetricSnapshot {
    #[serde(flatten)]
    pub server: ServerDescriptor,
    pub status: ServerStatus,
    pub cpu_load: u8,
    pub memory_usage: u8,
}

impl ServerMetricSnapshot {
    /// `status != ONLINE` implies both loads are zero; ONLINE loads stay in range.
    pub fn is_consistent(&self) -> bool {
        match self.status {
            ServerStatus::Online => {
                CPU_LOAD_RANGE.contains(&self.cpu_load)
                    && MEMORY_USAGE_RANGE.contains(&self.memory_usage)
            }
            _ => self.cpu_load == 0 && self.memory_usage == 0,
        }
    }
}

/// Draw one snapshot for `server`. The descriptor is cloned, never mutated.
pub fn randomize<R: Rng + ?Sized>(server: &ServerDescriptor, rng: &mut R) -> ServerMetricSnapshot {
    let status = STATUS_WEIGHTS
        .choose(rng)
        .copied()
        .unwrap_or(ServerStatus::Online);

    let (cpu_load, memory_usage) = if status == ServerStatus::Online {
        (rng.gen_range(CPU_LOAD_RANGE), rng.gen_range(MEMORY_USAGE_RANGE))
    } else {
        (0, 0)
    };

    ServerMetricSnapshot {
        server: server.clone(),
        status,
        cpu_load,
        memory_usage,
    }
}

/// Randomize every fixture, preserving store order.
pub fn randomize_all<R: Rng + ?Sized>(store: &FixtureStore, rng: &mut R) -> Vec<ServerMetricSnapshot> {
    store.iter().map(|s| randomize(s, rng)).collect()
}
