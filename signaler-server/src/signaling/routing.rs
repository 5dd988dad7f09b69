use crate::error::{RoutingError, TransportError};
use crate::room::{RoomRegistry, Session};
use futures::future::join_all;
use signaler_core::{CandidateArgs, PeerId, SdpArgs, SessionAddress, SignalMessage};
use tracing::{debug, warn};

/// Sends the requester every other peer currently in its room.
pub async fn send_members(
    registry: &RoomRegistry<Session>,
    session: &Session,
) -> Result<(), TransportError> {
    let mut members: Vec<PeerId> = registry
        .lookup_room(session.tenant_id(), session.room_id())
        .map(|view| {
            view.peer_ids()
                .filter(|id| *id != session.peer_id())
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    members.sort();

    session.send(&SignalMessage::members(members)).await
}

pub async fn forward_sdp(
    registry: &RoomRegistry<Session>,
    session: &Session,
    mut args: SdpArgs,
) -> Result<(), RoutingError> {
    args.src = session.peer_id().clone();
    let dst = args.dst.clone();
    forward(registry, session, &dst, SignalMessage::Sdp(args)).await
}

pub async fn forward_candidate(
    registry: &RoomRegistry<Session>,
    session: &Session,
    mut args: CandidateArgs,
) -> Result<(), RoutingError> {
    args.src = session.peer_id().clone();
    let dst = args.dst.clone();
    forward(registry, session, &dst, SignalMessage::Candidate(args)).await
}

async fn forward(
    registry: &RoomRegistry<Session>,
    session: &Session,
    dst: &PeerId,
    message: SignalMessage,
) -> Result<(), RoutingError> {
    let target = registry
        .lookup_session(session.tenant_id(), session.room_id(), dst)
        .ok_or_else(|| RoutingError::NoSuchDestination(dst.clone()))?;

    debug!(
        tenant_id = %session.tenant_id(),
        room_id = %session.room_id(),
        src = %session.peer_id(),
        %dst,
        method = message.method(),
        "Forwarding"
    );

    target
        .send(&message)
        .await
        .map_err(|source| RoutingError::Undeliverable {
            dst: dst.clone(),
            source,
        })
}

pub async fn send_ping(session: &Session) -> Result<(), TransportError> {
    session.send(&SignalMessage::ping()).await
}

/// Tells every remaining member of the room that `departed` left.
///
/// Sends go out concurrently; a failed send is logged and skipped.
/// Returns how many members were notified.
pub async fn announce_exit(registry: &RoomRegistry<Session>, departed: &SessionAddress) -> usize {
    let Some(view) = registry.lookup_room(&departed.tenant_id, &departed.room_id) else {
        return 0;
    };

    let message = SignalMessage::exit(departed.peer_id.clone());
    let message = &message;

    let sends = view
        .into_iter()
        .filter(|(peer_id, _)| *peer_id != departed.peer_id)
        .map(|(peer_id, member)| async move {
            match member.send(message).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(
                        tenant_id = %departed.tenant_id,
                        room_id = %departed.room_id,
                        departed = %departed.peer_id,
                        %peer_id,
                        error = %e,
                        "Failed to announce exit"
                    );
                    false
                }
            }
        });

    join_all(sends).await.into_iter().filter(|sent| *sent).count()
}
