pub use signaler_core::{PeerId, RoomId, SessionAddress, TenantId};

pub mod model {
    pub use signaler_core::model::*;
    pub use signaler_core::ProtocolError;
}

#[cfg(feature = "server")]
pub mod server {
    pub use signaler_server::*;
}
