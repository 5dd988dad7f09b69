use async_trait::async_trait;
use signaler_core::SessionAddress;

/// Application callbacks around a connection's lifetime in a room.
///
/// Hooks observe; they cannot veto routing. They run on the connection's own
/// task, so a slow hook delays only that connection.
#[async_trait]
pub trait SessionHooks: Send + Sync + 'static {
    /// After the session is registered and before the presence list is sent.
    async fn on_join(&self, _address: &SessionAddress) {}

    /// Every inbound payload, before it is decoded and dispatched.
    async fn on_message(&self, _address: &SessionAddress, _raw: &str) {}

    /// After teardown finished and the exit notice went out.
    async fn on_leave(&self, _address: &SessionAddress) {}
}

pub struct NoopHooks;

impl SessionHooks for NoopHooks {}
