//! Fixture store: the fixed, read-only list of servers every route reports on.
//!
//! The store is built once at startup and shared behind an `Arc`; there is no
//! mutating API.

use std::collections::HashSet;
use std::slice::Iter;

use serde::{Deserialize, Serialize};

use crate::error::{FleetPulseError, Result};

/// One server entry. Immutable for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDescriptor {
    pub id: String,
    pub name: String,
    pub ip_address: String,
    pub location: String,
}

impl ServerDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        ip_address: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ip_address: ip_address.into(),
            location: location.into(),
        }
    }
}

/// Ordered, immutable sequence of `ServerDescriptor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureStore {
    servers: Vec<ServerDescriptor>,
}

impl FixtureStore {
    /// Build a store from an explicit list. Ids must be unique and non-empty.
    pub fn new(servers: Vec<ServerDescriptor>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(servers.len());
        for s in &servers {
            if s.id.is_empty() {
                return Err(FleetPulseError::BadRequest("fixture id must not be empty".into()));
            }
            if !seen.insert(s.id.as_str()) {
                return Err(FleetPulseError::BadRequest(format!(
                    "duplicate fixture id: {}",
                    s.id
                )));
            }
        }
        Ok(Self { servers })
    }

    pub fn servers(&self) -> &[ServerDescriptor] {
        &self.servers
    }

    pub fn iter(&self) -> Iter<'_, ServerDescriptor> {
        self.servers.iter()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

impl Default for FixtureStore {
    fn default() -> Self {
        Self {
            servers: vec![
                ServerDescriptor::new("srv-db-01", "Database Server 1", "192.168.1.10", "us-east-1"),
                ServerDescriptor::new("srv-web-01", "Web Server Alpha", "10.0.0.5", "eu-west-2"),
                ServerDescriptor::new("srv-cache-01", "Redis Cache", "172.16.0.20", "ap-southeast-1"),
                ServerDescriptor::new("srv-worker-01", "Background Worker", "192.168.2.30", "us-west-2"),
            ],
        }
    }
}

impl<'a> IntoIterator for &'a FixtureStore {
    type Item = &'a ServerDescriptor;
    type IntoIter = Iter<'a, ServerDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
