mod authenticator;
mod connection_state;
mod routing;
mod signaling_service;
mod ws_handler;

pub use authenticator::*;
pub use connection_state::*;
pub use routing::*;
pub use signaling_service::*;
pub use ws_handler::*;
