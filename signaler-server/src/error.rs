use signaler_core::{PeerId, ProtocolError, RoomId, TenantId};
use std::time::Duration;
use thiserror::Error;

/// Read, write or close failure on one connection's channel.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("channel closed")]
    Closed,

    #[error("websocket error: {0}")]
    WebSocket(#[from] axum::Error),

    #[error("write timed out after {0:?}")]
    WriteTimeout(Duration),

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("binary frame is not valid UTF-8")]
    NonUtf8,
}

/// An addressed message could not reach its destination. The sender stays connected.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("no such destination {0}")]
    NoSuchDestination(PeerId),

    #[error("destination {dst} is not deliverable: {source}")]
    Undeliverable {
        dst: PeerId,
        #[source]
        source: TransportError,
    },
}

/// Returned by `RoomRegistry::destroy_session` when cleanup already happened.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no rooms for tenant {0}")]
    TenantNotFound(TenantId),

    #[error("room {room_id} not found for tenant {tenant_id}")]
    RoomNotFound { tenant_id: TenantId, room_id: RoomId },

    #[error("peer {peer_id} not found in room {room_id} for tenant {tenant_id}")]
    PeerNotFound {
        tenant_id: TenantId,
        room_id: RoomId,
        peer_id: PeerId,
    },
}

/// Anything that can go wrong while serving one connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Routing(#[from] RoutingError),
}

impl ConnectionError {
    /// Only routing failures leave the connection open.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Routing(_))
    }
}
