use crate::error::TransportError;
use async_trait::async_trait;

/// Write half of a connection. Not safe for concurrent writers; `Session` serializes access.
#[async_trait]
pub trait FrameSink: Send + 'static {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Read half of a connection, owned by exactly one reader task.
#[async_trait]
pub trait FrameStream: Send + 'static {
    /// Next text payload. `None` once the peer closed the channel.
    async fn next_text(&mut self) -> Option<Result<String, TransportError>>;
}
