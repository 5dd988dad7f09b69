use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Default, Serialize, Deserialize, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Top-level isolation scope (the API key id). Rooms never cross tenants.
    TenantId
);

string_id!(
    /// Named set of peers within a tenant.
    RoomId
);

string_id!(
    /// Session key of one connection. Unique only within its room.
    PeerId
);

/// The `(tenant, room, peer)` triple. This is the only addressing scheme.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct SessionAddress {
    pub tenant_id: TenantId,
    pub room_id: RoomId,
    pub peer_id: PeerId,
}

impl SessionAddress {
    pub fn new(
        tenant_id: impl Into<TenantId>,
        room_id: impl Into<RoomId>,
        peer_id: impl Into<PeerId>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            room_id: room_id.into(),
            peer_id: peer_id.into(),
        }
    }
}

impl fmt::Display for SessionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.tenant_id, self.room_id, self.peer_id)
    }
}
