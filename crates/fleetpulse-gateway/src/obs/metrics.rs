//! Minimal metrics registry for the gateway.
//!
//! Counter and gauge types with dynamic labels backed by `DashMap`. Labels are
//! flattened into sorted key vectors to keep deterministic ordering.

use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn render_labels(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self.map.entry(label_key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, render_labels(r.key()), val);
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn dec(&self, labels: &[(&str, &str)]) {
        self.add(labels, -1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self.map.entry(label_key(labels)).or_insert_with(|| AtomicI64::new(0));
        gauge.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> i64 {
        self.map
            .get(&label_key(labels))
            .map(|g| g.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} gauge", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, render_labels(r.key()), val);
        }
    }
}

/// Which feed a connection is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    Stream,
    Ws,
}

impl FeedMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedMode::Stream => "stream",
            FeedMode::Ws => "ws",
        }
    }
}

#[derive(Default)]
pub struct GatewayMetrics {
    pub connections: CounterVec,
    pub connections_active: GaugeVec,
    pub ticks: CounterVec,
}

impl GatewayMetrics {
    /// Count a new connection and hold its active slot until the guard drops.
    pub fn track(self: &Arc<Self>, mode: FeedMode) -> ActiveGuard {
        let labels = [("mode", mode.as_str())];
        self.connections.inc(&labels);
        self.connections_active.inc(&labels);
        ActiveGuard {
            metrics: Arc::clone(self),
            mode,
        }
    }

    pub fn record_tick(&self, mode: FeedMode) {
        self.ticks.inc(&[("mode", mode.as_str())]);
    }

    pub fn active(&self, mode: FeedMode) -> i64 {
        self.connections_active.get(&[("mode", mode.as_str())])
    }

    /// Render all registered metrics plus any extra lines provided by callers.
    pub fn render(&self, extra: &[(&str, u64)]) -> String {
        let mut out = String::new();
        self.connections.render("fleetpulse_connections_total", &mut out);
        self.connections_active.render("fleetpulse_connections_active", &mut out);
        self.ticks.render("fleetpulse_ticks_total", &mut out);
        for (k, v) in extra {
            let _ = writeln!(out, "{} {}", k, v);
        }
        out
    }
}

/// Releases a connection's active slot on drop, however the connection ended.
pub struct ActiveGuard {
    metrics: Arc<GatewayMetrics>,
    mode: FeedMode,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.metrics.connections_active.dec(&[("mode", self.mode.as_str())]);
        tracing::debug!(mode = self.mode.as_str(), "feed connection released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_releases_active_slot() {
        let m = Arc::new(GatewayMetrics::default());
        {
            let _a = m.track(FeedMode::Ws);
            let _b = m.track(FeedMode::Ws);
            assert_eq!(m.active(FeedMode::Ws), 2);
            assert_eq!(m.active(FeedMode::Stream), 0);
        }
        assert_eq!(m.active(FeedMode::Ws), 0);
        assert_eq!(m.connections.get(&[("mode", "ws")]), 2);
    }

    #[test]
    fn render_is_prometheus_text() {
        let m = Arc::new(GatewayMetrics::default());
        let _g = m.track(FeedMode::Stream);
        m.record_tick(FeedMode::Stream);
        m.record_tick(FeedMode::Stream);

        let out = m.render(&[("fleetpulse_fixtures", 4)]);
        assert!(out.contains("# TYPE fleetpulse_connections_total counter"));
        assert!(out.contains("fleetpulse_connections_active{mode=\"stream\"} 1"));
        assert!(out.contains("fleetpulse_ticks_total{mode=\"stream\"} 2"));
        assert!(out.contains("fleetpulse_fixtures 4"));
    }
}
