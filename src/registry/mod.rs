//! Peer registry for broadcast routing
//!
//! The registry owns the set of currently live peer connections and keeps
//! membership changes linearizable while fan-out writes happen outside
//! its lock.
//!
//! # Architecture
//!
//! ```text
//!                        Arc<PeerRegistry>
//!                   ┌─────────────────────────┐
//!                   │ peers: BTreeMap<PeerId, │
//!                   │   Arc<Peer {            │
//!                   │     writer: Mutex<Sink> │
//!                   │   }>                    │
//!                   │ >                       │
//!                   └───────────┬─────────────┘
//!                               │ snapshot()
//!        ┌──────────────────────┼──────────────────────┐
//!        │                      │                      │
//!        ▼                      ▼                      ▼
//!   [receive loop]         [receive loop]         [receive loop]
//!   reader.next()          reader.next()          reader.next()
//!        │                      │                      │
//!        └──► fan_out() ──► peer.send() for every other peer
//! ```
//!
//! # Zero-Copy Design
//!
//! `Frame` payloads are `bytes::Bytes`, so fanning one frame out to N
//! peers shares a single allocation; each `peer.send` clones a handle,
//! not the data.

pub mod entry;
pub mod error;
pub mod frame;
pub mod store;

pub use entry::{Peer, PeerId, PeerWriter};
pub use error::RegistryError;
pub use frame::{Frame, FrameKind};
pub use store::PeerRegistry;
