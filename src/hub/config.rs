//! Hub configuration

/// Hub configuration options
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum concurrent peers (0 = unlimited)
    pub max_peers: usize,

    /// Deliver a sender's frames back to the sender as well
    ///
    /// Off by default: a chat participant does not hear its own messages
    /// echoed. Flip this for transports whose clients rely on the echo.
    pub echo_to_sender: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_peers: 0,
            echo_to_sender: false,
        }
    }
}

impl HubConfig {
    /// Set maximum concurrent peers
    pub fn max_peers(mut self, max: usize) -> Self {
        self.max_peers = max;
        self
    }

    /// Set the echo-to-sender policy
    pub fn echo_to_sender(mut self, echo: bool) -> Self {
        self.echo_to_sender = echo;
        self
    }
}
