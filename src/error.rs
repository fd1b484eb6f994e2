//! Crate-wide error types
//!
//! Per-peer failures (`Read`, `Write`) are contained at the peer boundary:
//! they terminate that one connection and are never escalated to other
//! peers or to the caller. `Upgrade` is surfaced to whoever handed the
//! socket in, before any registration happened.

use crate::registry::RegistryError;

/// Transport-level error from the WebSocket layer
pub type WsError = tokio_tungstenite::tungstenite::Error;

/// Convenience result type for hub operations
pub type Result<T> = std::result::Result<T, HubError>;

/// Error type for hub operations
#[derive(Debug)]
pub enum HubError {
    /// WebSocket upgrade handshake did not complete; no peer was registered
    Upgrade(WsError),
    /// Read from a peer failed; terminates only that peer's receive loop
    Read(WsError),
    /// Write to a peer failed; evicts only that peer from the fan-out
    Write(WsError),
    /// Listener-level I/O failure (bind/accept)
    Io(std::io::Error),
    /// Registry refused the registration
    Registry(RegistryError),
}

impl std::fmt::Display for HubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HubError::Upgrade(e) => write!(f, "Upgrade handshake failed: {}", e),
            HubError::Read(e) => write!(f, "Peer read failed: {}", e),
            HubError::Write(e) => write!(f, "Peer write failed: {}", e),
            HubError::Io(e) => write!(f, "I/O error: {}", e),
            HubError::Registry(e) => write!(f, "Registry error: {}", e),
        }
    }
}

impl std::error::Error for HubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HubError::Upgrade(e) | HubError::Read(e) | HubError::Write(e) => Some(e),
            HubError::Io(e) => Some(e),
            HubError::Registry(e) => Some(e),
        }
    }
}

impl From<RegistryError> for HubError {
    fn from(e: RegistryError) -> Self {
        HubError::Registry(e)
    }
}

impl From<std::io::Error> for HubError {
    fn from(e: std::io::Error) -> Self {
        HubError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_conversion() {
        let err: HubError = RegistryError::Closed.into();
        assert!(matches!(err, HubError::Registry(RegistryError::Closed)));
    }

    #[test]
    fn test_display_includes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "addr in use");
        let err = HubError::Io(io);
        assert!(err.to_string().contains("addr in use"));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;

        let err: HubError = RegistryError::AtCapacity.into();
        assert!(err.source().is_some());
    }
}
