//! Statistics and metrics for the hub

pub mod metrics;

pub use metrics::{HubStats, HubStatsSnapshot};
