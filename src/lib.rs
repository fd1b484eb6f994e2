//! # wshub-rs
//!
//! WebSocket broadcast hub for real-time chat fan-out.
//!
//! A set of concurrently connected peers, where every frame received from
//! one peer is fanned out to every other live peer. Peers come and go at
//! arbitrary times; the shared connection set is mutated from many tasks
//! at once, so membership lives in a synchronized [`PeerRegistry`] and
//! fan-out writes happen against lock-free snapshots.
//!
//! ```text
//!   TcpListener ──► HubServer ──► Hub::handle_upgrade
//!                                     │ register + spawn
//!                                     ▼
//!                          receive loop (one per peer)
//!                                     │ per frame
//!                                     ▼
//!                          fan-out over registry snapshot
//! ```
//!
//! Failure policy: a peer whose read fails loses its receive loop; a peer
//! whose write fails is evicted mid-fan-out; neither event is visible to
//! any other peer.
//!
//! # Example
//!
//! ```no_run
//! use wshub_rs::{HubServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> wshub_rs::Result<()> {
//!     let config = ServerConfig::with_addr("127.0.0.1:8080".parse().unwrap());
//!     let server = HubServer::new(config);
//!     server.run_until(async {
//!         tokio::signal::ctrl_c().await.ok();
//!     })
//!     .await
//! }
//! ```

pub mod error;
pub mod hub;
pub mod registry;
pub mod server;
pub mod stats;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{HubError, Result, WsError};
pub use hub::{Hub, HubConfig};
pub use registry::{Frame, FrameKind, Peer, PeerId, PeerRegistry, PeerWriter, RegistryError};
pub use server::{HubServer, ServerConfig};
pub use stats::{HubStats, HubStatsSnapshot};
