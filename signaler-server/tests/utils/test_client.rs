use anyhow::{Context, Result, bail};
use signaler_core::{PeerId, SignalMessage};
use signaler_server::{CloseReason, SignalingService, TransportError};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout};

use super::mock_transport::{Inbound, mock_transport};

/// Timeout for a single expected message (ms).
pub const RECV_TIMEOUT_MS: u64 = 2000;

/// Window in which no message may arrive (ms).
pub const SILENCE_WINDOW_MS: u64 = 200;

/// A client connected to a `SignalingService` over the in-memory transport.
pub struct TestClient {
    pub peer_id: PeerId,
    to_server: Option<mpsc::UnboundedSender<Inbound>>,
    from_server: mpsc::UnboundedReceiver<String>,
    task: JoinHandle<CloseReason>,
}

pub fn query(tenant: &str, room: &str, peer: &str) -> HashMap<String, String> {
    HashMap::from([
        ("apiKey".to_string(), tenant.to_string()),
        ("room".to_string(), room.to_string()),
        ("sessionKey".to_string(), peer.to_string()),
    ])
}

impl TestClient {
    /// Starts serving a connection with arbitrary query parameters.
    pub fn spawn(service: &SignalingService, params: HashMap<String, String>) -> Self {
        let (stream, sink, ends) = mock_transport();
        let peer_id = PeerId::from(params.get("sessionKey").cloned().unwrap_or_default());

        let service = service.clone();
        let task = tokio::spawn(async move { service.serve(stream, sink, &params).await });

        Self {
            peer_id,
            to_server: Some(ends.to_server),
            from_server: ends.from_server,
            task,
        }
    }

    /// Connects and waits for the initial presence list, so the peer is registered on return.
    pub async fn connect(
        service: &SignalingService,
        tenant: &str,
        room: &str,
        peer: &str,
    ) -> Result<(Self, Vec<PeerId>)> {
        let mut client = Self::spawn(service, query(tenant, room, peer));

        match client.recv().await.context("No initial presence list")? {
            SignalMessage::Members(args) => Ok((client, args.members)),
            other => bail!("Expected members, got {:?}", other),
        }
    }

    pub fn send(&self, message: &SignalMessage) -> Result<()> {
        self.send_raw(&serde_json::to_string(message)?)
    }

    pub fn send_raw(&self, raw: &str) -> Result<()> {
        self.push(Ok(raw.to_owned()))
    }

    /// Makes the server's next read fail.
    pub fn inject_read_error(&self, error: TransportError) -> Result<()> {
        self.push(Err(error))
    }

    fn push(&self, inbound: Inbound) -> Result<()> {
        let tx = self.to_server.as_ref().context("Client already disconnected")?;
        tx.send(inbound)
            .map_err(|_| anyhow::anyhow!("Server stopped reading"))
    }

    async fn recv_frame(&mut self) -> Result<String> {
        timeout(
            Duration::from_millis(RECV_TIMEOUT_MS),
            self.from_server.recv(),
        )
        .await
        .context("Timeout waiting for message")?
        .context("Server closed the connection")
    }

    /// Next message from the server, including keepalive pings.
    pub async fn recv_any(&mut self) -> Result<SignalMessage> {
        let raw = self.recv_frame().await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Next non-ping frame from the server, exactly as written to the wire.
    pub async fn recv_raw(&mut self) -> Result<String> {
        loop {
            let raw = self.recv_frame().await?;
            if !matches!(serde_json::from_str(&raw)?, SignalMessage::Ping(_)) {
                return Ok(raw);
            }
        }
    }

    /// Next non-ping message from the server.
    pub async fn recv(&mut self) -> Result<SignalMessage> {
        loop {
            match self.recv_any().await? {
                SignalMessage::Ping(_) => continue,
                other => return Ok(other),
            }
        }
    }

    /// Requests and returns the presence list.
    pub async fn members(&mut self) -> Result<Vec<PeerId>> {
        self.send_raw(r#"{"method":"members","args":{}}"#)?;
        match self.recv().await? {
            SignalMessage::Members(args) => Ok(args.members),
            other => bail!("Expected members, got {:?}", other),
        }
    }

    /// Succeeds if nothing but pings arrives within the silence window.
    pub async fn expect_silence(&mut self) -> Result<()> {
        let deadline = Instant::now() + Duration::from_millis(SILENCE_WINDOW_MS);

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match timeout(remaining, self.from_server.recv()).await {
                Err(_) => return Ok(()),
                Ok(None) => bail!("Connection closed"),
                Ok(Some(raw)) => match serde_json::from_str::<SignalMessage>(&raw)? {
                    SignalMessage::Ping(_) => continue,
                    other => bail!("Unexpected message {:?}", other),
                },
            }
        }
    }

    /// Succeeds once the server closed its write half.
    pub async fn expect_closed(&mut self) -> Result<()> {
        loop {
            let next = timeout(
                Duration::from_millis(RECV_TIMEOUT_MS),
                self.from_server.recv(),
            )
            .await
            .context("Timeout waiting for close")?;

            if next.is_none() {
                return Ok(());
            }
        }
    }

    /// Stops draining server messages, so further writes to this peer fail.
    pub fn stop_reading(&mut self) {
        self.from_server.close();
    }

    /// Closes the client side and waits for the server to finish teardown.
    pub async fn disconnect(mut self) -> Result<CloseReason> {
        self.to_server.take();
        self.finish().await
    }

    /// Waits for the server side of this connection to end.
    pub async fn finish(self) -> Result<CloseReason> {
        let reason = timeout(Duration::from_millis(RECV_TIMEOUT_MS), self.task)
            .await
            .context("Timeout waiting for connection to end")??;
        Ok(reason)
    }
}
