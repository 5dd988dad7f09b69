mod ids;
mod request;
mod signaling;

pub use ids::{PeerId, RoomId, SessionAddress, TenantId};
pub use request::ClientRequest;
pub use signaling::{CandidateArgs, Empty, ExitArgs, Extra, MembersArgs, SdpArgs, SignalMessage};
