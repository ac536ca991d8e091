//! Scalar tick pushed over the WebSocket feed.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const TICK_VALUE_RANGE: RangeInclusive<u8> = 0..=99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarTick {
    pub value: u8,
}

impl ScalarTick {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            value: rng.gen_range(TICK_VALUE_RANGE),
        }
    }

    /// Serialized JSON text frame, e.g. `{"value":42}`.
    pub fn to_json(&self) -> String {
        // A single u8 field cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"value\":{}}}", self.value))
    }
}
