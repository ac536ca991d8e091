//! Top-level facade crate for FleetPulse.
//!
//! Re-exports the domain core and the gateway library so users can depend on a single crate.

pub mod core {
    pub use fleetpulse_core::*;
}

pub mod gateway {
    pub use fleetpulse_gateway::*;
}
