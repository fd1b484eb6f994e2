//! Registry error types

/// Error type for registry operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// Registry has been closed; no new peers are admitted
    Closed,
    /// Registry is at its configured maximum peer count
    AtCapacity,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Closed => write!(f, "Registry is closed"),
            RegistryError::AtCapacity => write!(f, "Registry is at capacity"),
        }
    }
}

impl std::error::Error for RegistryError {}
