//! Settings for the bundled transport.
//!
//! # Design
//! The core sets no timeout or redirect policy of its own. `TransportConfig`
//! only feeds `UreqTransport::new`; a custom `Transport` ignores it.

use std::time::Duration;

/// Settings applied to the bundled ureq transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound for a whole request, connect through body. `None` waits forever.
    pub timeout: Option<Duration>,
    pub user_agent: String,
    /// Zero disables redirect following.
    pub max_redirects: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            user_agent: format!("quester/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 5,
        }
    }
}
