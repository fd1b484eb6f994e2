//! Hub statistics
//!
//! Lock-free counters updated by the receive loops and the fan-out path.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Hub-wide counters (thread-safe)
#[derive(Debug, Default)]
pub struct HubStats {
    /// Connections accepted and registered
    connections_opened: AtomicU64,

    /// Receive loops that have terminated
    connections_closed: AtomicU64,

    /// Frames read from peers
    frames_received: AtomicU64,

    /// Frames successfully written during fan-out
    frames_sent: AtomicU64,

    /// Fan-out writes that failed and evicted their peer
    send_failures: AtomicU64,
}

impl HubStats {
    /// Create a new stats tracker
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn connection_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn frame_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn frame_sent(&self) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn send_failure(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of currently running receive loops
    pub fn active_connections(&self) -> u64 {
        self.connections_opened
            .load(Ordering::Relaxed)
            .saturating_sub(self.connections_closed.load(Ordering::Relaxed))
    }

    /// Get a point-in-time copy of all counters
    pub fn snapshot(&self) -> HubStatsSnapshot {
        HubStatsSnapshot {
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
            connections_closed: self.connections_closed.load(Ordering::Relaxed),
            frames_received: self.frames_received.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the hub counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubStatsSnapshot {
    pub connections_opened: u64,
    pub connections_closed: u64,
    pub frames_received: u64,
    pub frames_sent: u64,
    pub send_failures: u64,
}
