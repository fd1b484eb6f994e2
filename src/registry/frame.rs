//! Broadcast frame types
//!
//! A [`Frame`] is one opaque message unit received from a peer and fanned
//! out to the others. It is designed to be cheap to clone: the payload is
//! a reference-counted `Bytes`, so a broadcast to N peers shares one
//! allocation.

use bytes::Bytes;
use tokio_tungstenite::tungstenite::Message;

/// Kind of frame, inherited from the transport's framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// UTF-8 text frame
    Text,
    /// Binary frame
    Binary,
}

/// One opaque message unit (kind + payload)
///
/// Frames are immutable once received; clones share the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Text or binary, opaque to the hub beyond routing
    pub kind: FrameKind,
    /// Frame data (zero-copy via reference counting)
    pub payload: Bytes,
}

impl Frame {
    /// Create a text frame
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: FrameKind::Text,
            payload: Bytes::from(text.into().into_bytes()),
        }
    }

    /// Create a binary frame
    pub fn binary(data: impl Into<Bytes>) -> Self {
        Self {
            kind: FrameKind::Binary,
            payload: data.into(),
        }
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// View the payload as UTF-8 text, if it is valid UTF-8
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    /// Convert an inbound transport message into a frame
    ///
    /// Returns `None` for control messages (ping/pong/close) and raw
    /// protocol frames; those are transport traffic, never broadcast.
    pub fn from_message(msg: Message) -> Option<Self> {
        match msg {
            Message::Text(text) => Some(Self::text(text)),
            Message::Binary(data) => Some(Self::binary(data)),
            _ => None,
        }
    }

    /// Convert the frame into an outbound transport message
    pub fn into_message(self) -> Message {
        match self.kind {
            FrameKind::Text => Message::Text(String::from_utf8_lossy(&self.payload).into_owned()),
            FrameKind::Binary => Message::Binary(self.payload.to_vec()),
        }
    }
}
