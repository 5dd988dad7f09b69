use crate::error::{ConnectionError, TransportError};
use crate::room::{RoomRegistry, Session, SessionHooks};
use crate::signaling::{Authenticator, ConnectionState, routing};
use crate::transport::{FrameSink, FrameStream, TransportConfig};
use signaler_core::{ClientRequest, SessionAddress};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Why a connection ended.
#[derive(Debug)]
pub enum CloseReason {
    /// The authenticator rejected the request; nothing was registered.
    Unauthenticated,
    /// The initial presence list could not be written.
    PresenceFailed(TransportError),
    /// The peer closed the channel or a read failed.
    ReaderStopped,
    /// A keepalive `ping` could not be written.
    KeepaliveFailed(TransportError),
    /// A client message was fatal to the connection.
    HandlerFailed(ConnectionError),
}

struct SignalingInner {
    registry: Arc<RoomRegistry<Session>>,
    authenticator: Arc<dyn Authenticator>,
    hooks: Arc<dyn SessionHooks>,
    config: TransportConfig,
}

/// Runs connections against one shared room registry.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new(
        registry: Arc<RoomRegistry<Session>>,
        authenticator: Arc<dyn Authenticator>,
        hooks: Arc<dyn SessionHooks>,
        config: TransportConfig,
    ) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                registry,
                authenticator,
                hooks,
                config,
            }),
        }
    }

    pub fn registry(&self) -> &Arc<RoomRegistry<Session>> {
        &self.inner.registry
    }

    pub fn config(&self) -> &TransportConfig {
        &self.inner.config
    }

    /// Serves one upgraded connection until it closes.
    ///
    /// Teardown (deregister, announce exit, close the sink) runs exactly once
    /// for every connection that got past authentication.
    pub async fn serve<R, W>(
        &self,
        stream: R,
        mut sink: W,
        params: &HashMap<String, String>,
    ) -> CloseReason
    where
        R: FrameStream,
        W: FrameSink,
    {
        let mut state = ConnectionState::Connecting;
        advance(&mut state, ConnectionState::Authenticating, None);

        let Some(address) = self.inner.authenticator.authenticate(params).await else {
            advance(&mut state, ConnectionState::Closed, None);
            if let Err(e) = sink.close().await {
                debug!("Failed to close rejected websocket: {}", e);
            }
            return CloseReason::Unauthenticated;
        };

        let session = Arc::new(Session::new(
            address.clone(),
            Box::new(sink),
            self.inner.config.write_timeout,
        ));
        advance(&mut state, ConnectionState::Active, Some(&address));

        self.inner.registry.store(
            &address.tenant_id,
            &address.room_id,
            &address.peer_id,
            session.clone(),
        );
        info!(
            tenant_id = %address.tenant_id,
            room_id = %address.room_id,
            peer_id = %address.peer_id,
            "Session joined"
        );
        self.inner.hooks.on_join(&address).await;

        let reason = match routing::send_members(&self.inner.registry, &session).await {
            Ok(()) => self.run(&session, stream).await,
            Err(e) => {
                error!(
                    tenant_id = %address.tenant_id,
                    room_id = %address.room_id,
                    peer_id = %address.peer_id,
                    error = %e,
                    "Call to send members failed"
                );
                CloseReason::PresenceFailed(e)
            }
        };

        advance(&mut state, ConnectionState::Closing, Some(&address));
        self.teardown(&session).await;
        advance(&mut state, ConnectionState::Closed, Some(&address));

        reason
    }

    /// Multiplexes the reader task, the keepalive ticker and dispatch.
    async fn run<R: FrameStream>(&self, session: &Arc<Session>, stream: R) -> CloseReason {
        let address = session.address();
        let (in_tx, mut in_rx) = mpsc::channel(self.inner.config.inbound_queue.max(1));
        let reader = tokio::spawn(read_loop(stream, in_tx, address.clone()));

        let period = self.inner.config.ping_period;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let reason = loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = routing::send_ping(session).await {
                        error!(
                            tenant_id = %address.tenant_id,
                            room_id = %address.room_id,
                            peer_id = %address.peer_id,
                            error = %e,
                            "Send ping has failed"
                        );
                        break CloseReason::KeepaliveFailed(e);
                    }
                }

                raw = in_rx.recv() => {
                    let Some(raw) = raw else {
                        break CloseReason::ReaderStopped;
                    };

                    match self.handle_client_message(session, &raw).await {
                        Ok(()) => {}
                        Err(e) if e.is_recoverable() => {
                            warn!(
                                tenant_id = %address.tenant_id,
                                room_id = %address.room_id,
                                peer_id = %address.peer_id,
                                error = %e,
                                "Dropped client message"
                            );
                        }
                        Err(e) => {
                            error!(
                                tenant_id = %address.tenant_id,
                                room_id = %address.room_id,
                                peer_id = %address.peer_id,
                                error = %e,
                                "Handle client message has failed"
                            );
                            break CloseReason::HandlerFailed(e);
                        }
                    }
                }
            }
        };

        reader.abort();
        reason
    }

    async fn handle_client_message(
        &self,
        session: &Session,
        raw: &str,
    ) -> Result<(), ConnectionError> {
        let address = session.address();
        debug!(
            tenant_id = %address.tenant_id,
            room_id = %address.room_id,
            peer_id = %address.peer_id,
            msg = raw,
            "Reading from websocket"
        );
        self.inner.hooks.on_message(address, raw).await;

        let registry = &self.inner.registry;
        match ClientRequest::decode(raw)? {
            ClientRequest::Members => routing::send_members(registry, session).await?,
            ClientRequest::Sdp(args) => routing::forward_sdp(registry, session, args).await?,
            ClientRequest::Candidate(args) => {
                routing::forward_candidate(registry, session, args).await?
            }
            ClientRequest::Pong => {}
        }

        Ok(())
    }

    /// Deregister before announcing, so nobody is told about a peer they can still see.
    async fn teardown(&self, session: &Session) {
        let address = session.address();

        if let Err(e) = self.inner.registry.destroy_session(
            &address.tenant_id,
            &address.room_id,
            &address.peer_id,
        ) {
            warn!(
                tenant_id = %address.tenant_id,
                room_id = %address.room_id,
                peer_id = %address.peer_id,
                error = %e,
                "Failed to destroy session"
            );
        }

        let notified = routing::announce_exit(&self.inner.registry, address).await;

        if let Err(e) = session.close().await {
            debug!(
                tenant_id = %address.tenant_id,
                room_id = %address.room_id,
                peer_id = %address.peer_id,
                error = %e,
                "Failed to close websocket"
            );
        }

        info!(
            tenant_id = %address.tenant_id,
            room_id = %address.room_id,
            peer_id = %address.peer_id,
            notified,
            "Session left"
        );
        self.inner.hooks.on_leave(address).await;
    }
}

async fn read_loop<R: FrameStream>(
    mut stream: R,
    in_tx: mpsc::Sender<String>,
    address: SessionAddress,
) {
    while let Some(next) = stream.next_text().await {
        match next {
            Ok(raw) => {
                if in_tx.send(raw).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!(
                    tenant_id = %address.tenant_id,
                    room_id = %address.room_id,
                    peer_id = %address.peer_id,
                    error = %e,
                    "Websocket read error"
                );
                break;
            }
        }
    }

    debug!(
        tenant_id = %address.tenant_id,
        room_id = %address.room_id,
        peer_id = %address.peer_id,
        "Reader ending"
    );
}

fn advance(state: &mut ConnectionState, next: ConnectionState, address: Option<&SessionAddress>) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal transition {state:?} -> {next:?}"
    );
    match address {
        Some(address) => debug!(%address, from = ?state, to = ?next, "Connection state"),
        None => debug!(from = ?state, to = ?next, "Connection state"),
    }
    *state = next;
}
