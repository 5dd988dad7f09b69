use crate::error::TransportError;
use crate::transport::FrameSink;
use signaler_core::{PeerId, RoomId, SessionAddress, SignalMessage, TenantId};
use std::fmt;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::trace;

/// One authenticated connection as seen by everyone else.
///
/// The owning connection reads from its own stream; any task may write
/// through `send`, which holds the session's lock for the whole write.
pub struct Session {
    address: SessionAddress,
    sink: Mutex<Box<dyn FrameSink>>,
    write_timeout: Duration,
}

impl Session {
    pub fn new(address: SessionAddress, sink: Box<dyn FrameSink>, write_timeout: Duration) -> Self {
        Self {
            address,
            sink: Mutex::new(sink),
            write_timeout,
        }
    }

    pub fn address(&self) -> &SessionAddress {
        &self.address
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.address.tenant_id
    }

    pub fn room_id(&self) -> &RoomId {
        &self.address.room_id
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.address.peer_id
    }

    /// Encodes and writes one message. Any error means this session is gone.
    pub async fn send(&self, message: &SignalMessage) -> Result<(), TransportError> {
        let text = serde_json::to_string(message)?;
        trace!(
            tenant_id = %self.address.tenant_id,
            room_id = %self.address.room_id,
            peer_id = %self.address.peer_id,
            msg = %text,
            "Writing to websocket"
        );

        let mut sink = self.sink.lock().await;
        tokio::time::timeout(self.write_timeout, sink.send_text(text))
            .await
            .map_err(|_| TransportError::WriteTimeout(self.write_timeout))?
    }

    pub(crate) async fn close(&self) -> Result<(), TransportError> {
        self.sink.lock().await.close().await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
