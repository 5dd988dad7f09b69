use crate::error::RegistryError;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use signaler_core::{PeerId, RoomId, TenantId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

type Rooms<S> = DashMap<RoomId, HashMap<PeerId, Arc<S>>>;

/// Live sessions addressed by tenant, then room, then peer.
///
/// A room exists only while it has at least one peer, and a tenant only while
/// it has at least one room. Every mutation goes through the parent level's
/// entry guard, so the emptiness check and the removal of an emptied level
/// happen under the same shard lock that the insert would need. There is no
/// registry-wide lock; only tenants hashed to the same shard contend.
///
/// No guard ever escapes a method; callers get owned `Arc` handles or snapshots.
pub struct RoomRegistry<S> {
    tenants: DashMap<TenantId, Rooms<S>>,
}

/// Members of one room at the time of the lookup.
#[derive(Debug)]
pub struct RoomView<S> {
    members: Vec<(PeerId, Arc<S>)>,
}

impl<S> RoomView<S> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.members.iter().any(|(id, _)| id == peer_id)
    }

    pub fn peer_ids(&self) -> impl Iterator<Item = &PeerId> {
        self.members.iter().map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PeerId, &Arc<S>)> {
        self.members.iter().map(|(id, session)| (id, session))
    }
}

impl<S> IntoIterator for RoomView<S> {
    type Item = (PeerId, Arc<S>);
    type IntoIter = std::vec::IntoIter<(PeerId, Arc<S>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<S> Default for RoomRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> RoomRegistry<S> {
    pub fn new() -> Self {
        Self {
            tenants: DashMap::new(),
        }
    }

    /// Inserts or replaces the session at this address.
    ///
    /// A replaced session is dropped from the registry but not closed.
    pub fn store(&self, tenant_id: &TenantId, room_id: &RoomId, peer_id: &PeerId, session: Arc<S>) {
        let rooms = self.tenants.entry(tenant_id.clone()).or_default();
        let mut peers = rooms.entry(room_id.clone()).or_default();

        if peers.insert(peer_id.clone(), session).is_some() {
            debug!(%tenant_id, %room_id, %peer_id, "Replaced existing session");
        }
    }

    pub fn lookup_session(
        &self,
        tenant_id: &TenantId,
        room_id: &RoomId,
        peer_id: &PeerId,
    ) -> Option<Arc<S>> {
        let rooms = self.tenants.get(tenant_id)?;
        let peers = rooms.get(room_id)?;
        peers.get(peer_id).cloned()
    }

    /// Snapshot of a room's members, or `None` if the room does not exist.
    pub fn lookup_room(&self, tenant_id: &TenantId, room_id: &RoomId) -> Option<RoomView<S>> {
        let rooms = self.tenants.get(tenant_id)?;
        let peers = rooms.get(room_id)?;
        let members = peers
            .iter()
            .map(|(id, session)| (id.clone(), session.clone()))
            .collect();

        Some(RoomView { members })
    }

    /// Removes the peer, then the room if it emptied, then the tenant if it emptied.
    ///
    /// Fails without touching anything if no session is stored at the address.
    pub fn destroy_session(
        &self,
        tenant_id: &TenantId,
        room_id: &RoomId,
        peer_id: &PeerId,
    ) -> Result<(), RegistryError> {
        let Entry::Occupied(tenant) = self.tenants.entry(tenant_id.clone()) else {
            return Err(RegistryError::TenantNotFound(tenant_id.clone()));
        };

        match tenant.get().entry(room_id.clone()) {
            Entry::Occupied(mut room) => {
                if room.get_mut().remove(peer_id).is_none() {
                    return Err(RegistryError::PeerNotFound {
                        tenant_id: tenant_id.clone(),
                        room_id: room_id.clone(),
                        peer_id: peer_id.clone(),
                    });
                }
                if room.get().is_empty() {
                    room.remove();
                    debug!(%tenant_id, %room_id, "Room emptied, removed");
                }
            }
            Entry::Vacant(_) => {
                return Err(RegistryError::RoomNotFound {
                    tenant_id: tenant_id.clone(),
                    room_id: room_id.clone(),
                });
            }
        }

        if tenant.get().is_empty() {
            tenant.remove();
            debug!(%tenant_id, "Tenant emptied, removed");
        }

        Ok(())
    }

    pub fn tenant_count(&self) -> usize {
        self.tenants.len()
    }

    pub fn room_count(&self, tenant_id: &TenantId) -> usize {
        self.tenants.get(tenant_id).map_or(0, |rooms| rooms.len())
    }

    pub fn has_tenant(&self, tenant_id: &TenantId) -> bool {
        self.tenants.contains_key(tenant_id)
    }

    pub fn has_room(&self, tenant_id: &TenantId, room_id: &RoomId) -> bool {
        self.tenants
            .get(tenant_id)
            .is_some_and(|rooms| rooms.contains_key(room_id))
    }

    /// Checks that no tenant or room level is present while empty.
    pub fn is_consistent(&self) -> bool {
        self.tenants.iter().all(|tenant| {
            !tenant.is_empty() && tenant.iter().all(|room| !room.is_empty())
        })
    }
}
