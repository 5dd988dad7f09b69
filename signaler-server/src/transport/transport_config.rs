use std::time::Duration;

/// Per-connection timing and buffering.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Interval between server `ping` messages.
    pub ping_period: Duration,
    /// Upper bound on a single write to a session.
    pub write_timeout: Duration,
    /// Payloads the reader task may queue ahead of the dispatcher.
    pub inbound_queue: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ping_period: Duration::from_secs(5),
            write_timeout: Duration::from_secs(10),
            inbound_queue: 16,
        }
    }
}
